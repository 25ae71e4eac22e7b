//! Table query description rendered to PostgREST query pairs.

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Filter {
    Eq(String, String),
    In(String, Vec<String>),
    /// Case-insensitive substring match.
    Contains(String, String),
}

impl Filter {
    /// Simple operator values are sent raw; only `in.(...)` elements are quoted.
    fn to_pair(&self) -> (String, String) {
        match self {
            Filter::Eq(col, v) => (col.clone(), format!("eq.{v}")),
            Filter::In(col, vs) => {
                let list = vs.iter().map(|v| quote_list_item(v)).collect::<Vec<_>>().join(",");
                (col.clone(), format!("in.({list})"))
            }
            Filter::Contains(col, v) => {
                let needle = v.replace(['*', '%'], "");
                (col.clone(), format!("ilike.*{needle}*"))
            }
        }
    }
}

/// PostgREST reserves `,.:()` inside list elements; quote those.
fn quote_list_item(v: &str) -> String {
    if v.chars().any(|c| matches!(c, ',' | '.' | ':' | '(' | ')' | '"' | ' ')) {
        format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        v.to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Order {
    pub column: String,
    pub direction: Direction,
}

/// A read against one table. `select` may embed related rows, e.g.
/// `*, profiles(full_name)` or `profiles:reporter_id(full_name, email)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Query {
    pub table: String,
    pub select: String,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn from(table: &str) -> Self {
        Self {
            table: table.to_string(),
            select: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.select = compact_select(columns);
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Eq(column.to_string(), value.into()));
        self
    }

    pub fn contains(mut self, column: &str, needle: impl Into<String>) -> Self {
        self.filters
            .push(Filter::Contains(column.to_string(), needle.into()));
        self
    }

    pub fn is_in<I, S>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.push(Filter::In(
            column.to_string(),
            values.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn order(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            direction,
        });
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut out = vec![("select".to_string(), self.select.clone())];
        out.extend(self.filters.iter().map(Filter::to_pair));
        if let Some(o) = &self.order {
            let dir = match o.direction {
                Direction::Asc => "asc",
                Direction::Desc => "desc",
            };
            out.push(("order".to_string(), format!("{}.{dir}", o.column)));
        }
        if let Some(n) = self.limit {
            out.push(("limit".to_string(), n.to_string()));
        }
        out
    }
}

/// Filter-only pairs for PATCH/DELETE.
pub(crate) fn filter_pairs(filters: &[Filter]) -> Vec<(String, String)> {
    filters.iter().map(Filter::to_pair).collect()
}

/// Strip whitespace from a multi-line select string; PostgREST rejects spaces
/// inside embedded resource lists.
fn compact_select(columns: &str) -> String {
    columns.chars().filter(|c| !c.is_whitespace()).collect()
}
