//! Transient notifications shown in the corner of every page.

pub(crate) const MAX_VISIBLE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn class(self) -> &'static str {
        match self {
            ToastKind::Success => "border-success/40 bg-success/10 text-foreground",
            ToastKind::Error => "border-destructive/40 bg-destructive/10 text-destructive",
            ToastKind::Info => "border-border bg-card text-card-foreground",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Oldest first. Pushing past [`MAX_VISIBLE`] drops the oldest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ToastQueue {
    next_id: u64,
    items: Vec<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Toast {
            id,
            kind,
            message: message.into(),
        });
        if self.items.len() > MAX_VISIBLE {
            let overflow = self.items.len() - MAX_VISIBLE;
            self.items.drain(..overflow);
        }
        id
    }

    /// No-op for ids already gone.
    pub fn dismiss(&mut self, id: u64) {
        self.items.retain(|t| t.id != id);
    }

    pub fn items(&self) -> &[Toast] {
        &self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_dismiss_is_targeted() {
        let mut q = ToastQueue::default();
        let a = q.push(ToastKind::Success, "Note uploaded successfully!");
        let b = q.push(ToastKind::Error, "Failed to fetch");
        assert_ne!(a, b);

        q.dismiss(a);
        assert_eq!(q.items().len(), 1);
        assert_eq!(q.items()[0].message, "Failed to fetch");

        q.dismiss(a);
        assert_eq!(q.items().len(), 1);
    }

    #[test]
    fn oldest_toasts_fall_off() {
        let mut q = ToastQueue::default();
        for i in 0..5 {
            q.push(ToastKind::Info, format!("t{i}"));
        }
        let msgs: Vec<_> = q.items().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(msgs, vec!["t2", "t3", "t4"]);
    }
}
