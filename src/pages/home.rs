use crate::components::ui::{Card, CardDescription, CardTitle};
use leptos::prelude::*;

const CTA_PRIMARY: &str = "inline-flex h-12 items-center justify-center rounded-md bg-primary px-8 text-lg font-medium text-primary-foreground hover:bg-primary/90";
const CTA_OUTLINE: &str = "inline-flex h-12 items-center justify-center rounded-md border border-input bg-background px-8 text-lg font-medium hover:bg-accent hover:text-accent-foreground";

const STEPS: [(&str, &str); 3] = [
    (
        "Upload Your Notes",
        "Share your best class notes, summaries, or past papers. Every contribution helps another student.",
    ),
    (
        "Earn Gyan Points",
        "Our automated system rewards you with 'Gyan Points' for every high-quality, helpful upload.",
    ),
    (
        "Unlock Any Note",
        "Use your earned points to instantly access and download any study material you need from our entire library.",
    ),
];

const FEATURES: [(&str, &str); 3] = [
    (
        "Community-Powered",
        "Built by students, for students. Quality is kept up by a community-driven rating and reputation system.",
    ),
    (
        "Completely Gamified",
        "Earn points, level up your reputation, and become a 'Top Contributor' in our community.",
    ),
    (
        "100% Free, Always",
        "Knowledge and educational resources should be accessible to every student, without any cost.",
    ),
];

#[component]
pub fn IndexPage() -> impl IntoView {
    view! {
        <div class="min-h-screen bg-background">
            <section class="bg-gradient-to-br from-primary/5 via-background to-accent/5">
                <div class="mx-auto max-w-4xl space-y-8 px-4 py-20 text-center md:py-32">
                    <h1 class="text-4xl font-bold leading-tight text-foreground md:text-6xl">
                        "Unlock India's Largest "
                        <span class="text-primary">"Student-Powered"</span>
                        " Study Library"
                    </h1>
                    <p class="mx-auto max-w-2xl text-xl text-muted-foreground md:text-2xl">
                        "Share your notes, earn Gyan Points, and access top-quality study material from students at every university. For free."
                    </p>
                    <div class="flex flex-col items-center justify-center gap-4 sm:flex-row">
                        <a href="/auth" class=CTA_PRIMARY>"Join the Community"</a>
                        <a href="/notes" class=CTA_OUTLINE>"Browse Notes"</a>
                    </div>
                </div>
            </section>

            <section class="py-20">
                <div class="mx-auto max-w-5xl px-4">
                    <h2 class="mb-4 text-center text-3xl font-bold md:text-4xl">"Get Started in 3 Simple Steps"</h2>
                    <p class="mb-16 text-center text-lg text-muted-foreground">
                        "Join thousands of students helping each other succeed"
                    </p>
                    <div class="grid gap-8 md:grid-cols-3">
                        {STEPS
                            .iter()
                            .enumerate()
                            .map(|(i, (title, body))| {
                                view! {
                                    <Card class="items-center px-8 text-center">
                                        <div class="flex size-16 items-center justify-center rounded-full bg-primary/10 text-2xl font-bold text-primary">
                                            {i + 1}
                                        </div>
                                        <CardTitle class="text-xl">{*title}</CardTitle>
                                        <CardDescription class="text-base">{*body}</CardDescription>
                                    </Card>
                                }
                            })
                            .collect_view()}
                    </div>
                </div>
            </section>

            <section class="bg-muted/30 py-20">
                <div class="mx-auto max-w-5xl px-4">
                    <h2 class="mb-4 text-center text-3xl font-bold md:text-4xl">"Why Padhai Co. is Different"</h2>
                    <p class="mb-16 text-center text-lg text-muted-foreground">
                        "A smarter way to share and access quality education"
                    </p>
                    <div class="grid gap-8 md:grid-cols-3">
                        {FEATURES
                            .iter()
                            .map(|(title, body)| {
                                view! {
                                    <Card class="bg-background px-8">
                                        <CardTitle class="text-xl">{*title}</CardTitle>
                                        <CardDescription class="text-base">{*body}</CardDescription>
                                    </Card>
                                }
                            })
                            .collect_view()}
                    </div>
                </div>
            </section>

            <section class="bg-primary py-20 text-center text-primary-foreground">
                <h2 class="mb-6 text-3xl font-bold md:text-5xl">"Ready to Ace Your Exams?"</h2>
                <p class="mx-auto mb-8 max-w-2xl text-xl opacity-90">
                    "Join thousands of students already sharing and learning together"
                </p>
                <a
                    href="/auth"
                    class="inline-flex h-12 items-center rounded-md bg-accent px-8 text-lg font-medium text-accent-foreground hover:bg-accent/90"
                >
                    "Create Your Free Account"
                </a>
            </section>

            <footer class="border-t py-8 text-center text-sm text-muted-foreground">
                "© 2025 Padhai Co. Made with ❤️ for students, by students."
            </footer>
        </div>
    }
}
