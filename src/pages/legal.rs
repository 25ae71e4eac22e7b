//! About, Privacy and Terms: static text rendered from section tables.

use crate::components::ui::{Card, CardContent};
use leptos::prelude::*;

struct Section {
    title: &'static str,
    body: &'static str,
    bullets: &'static [&'static str],
}

const ABOUT: &[Section] = &[
    Section {
        title: "Our Mission",
        body: "Padhai Co empowers students through shared knowledge. We connect learners across India so that good study material reaches everyone who needs it.",
        bullets: &[],
    },
    Section {
        title: "Quality Resources",
        body: "Access thousands of study notes, tutorials and learning materials contributed and rated by students.",
        bullets: &[],
    },
    Section {
        title: "Community Driven",
        body: "Join a community of learners who share knowledge, support each other and grow together.",
        bullets: &[],
    },
    Section {
        title: "Rewarding System",
        body: "Earn Gyan Points by contributing quality content and helping others. Build your reputation from Newbie to Legend.",
        bullets: &[],
    },
    Section {
        title: "Join Us Today",
        body: "Whether you want to find study material or share your own, sign up and become part of India's fastest-growing student community.",
        bullets: &[],
    },
];

const PRIVACY: &[Section] = &[
    Section {
        title: "Introduction",
        body: "At Padhai Co we are committed to protecting your privacy. This policy explains how we collect, use, disclose and safeguard your information when you use the platform.",
        bullets: &[],
    },
    Section {
        title: "Information We Collect",
        body: "Your name, email address and educational details when you register; the content you upload, vote on and report; and technical data such as IP address and browser type.",
        bullets: &[],
    },
    Section {
        title: "How We Use Your Information",
        body: "",
        bullets: &[
            "To provide and maintain our educational platform",
            "To personalize your learning experience",
            "To process your uploads and downloads",
            "To manage your Gyan Points and reputation level",
            "To communicate important updates and notifications",
            "To improve our services and develop new features",
            "To prevent fraud and ensure platform security",
        ],
    },
    Section {
        title: "Data Security",
        body: "We use industry-standard security measures to protect your personal information. No method of transmission over the internet is completely secure.",
        bullets: &[],
    },
    Section {
        title: "Your Rights",
        body: "You have the right to:",
        bullets: &[
            "Access and review your personal information",
            "Request corrections to your data",
            "Delete your account and associated data",
            "Opt-out of marketing communications",
            "Export your data in a portable format",
        ],
    },
    Section {
        title: "Cookies and Tracking",
        body: "We use local storage to keep you signed in and remember your theme.",
        bullets: &[],
    },
];

const TERMS: &[Section] = &[
    Section {
        title: "Agreement to Terms",
        body: "By accessing and using Padhai Co, you accept and agree to be bound by these Terms and Conditions. If you do not agree, please do not use the platform.",
        bullets: &[],
    },
    Section {
        title: "User Accounts",
        body: "",
        bullets: &[
            "You are responsible for maintaining the confidentiality of your account credentials.",
            "You must provide accurate and complete information when creating your account.",
            "You agree to notify us immediately of any unauthorized use of your account.",
        ],
    },
    Section {
        title: "Content Guidelines",
        body: "When uploading content to Padhai Co, you agree to:",
        bullets: &[
            "Only upload content you have the right to share",
            "Ensure content is accurate and educational in nature",
            "Not upload copyrighted material without proper authorization",
            "Not share offensive, inappropriate, or harmful content",
            "Respect intellectual property rights of others",
        ],
    },
    Section {
        title: "Gyan Points System",
        body: "Gyan Points are virtual credits used within the platform. They have no cash value and cannot be exchanged or transferred.",
        bullets: &[],
    },
    Section {
        title: "Prohibited Activities",
        body: "You may not:",
        bullets: &[
            "Use the platform for any illegal purposes",
            "Attempt to gain unauthorized access to our systems",
            "Interfere with other users' access to the platform",
            "Upload malicious code or viruses",
            "Engage in spamming or harassment",
            "Misrepresent your identity or affiliation",
        ],
    },
    Section {
        title: "Limitation of Liability",
        body: "Padhai Co is provided \"as is\" without warranties of any kind.",
        bullets: &[],
    },
    Section {
        title: "Changes to Terms",
        body: "We may modify these terms at any time. Continued use of the platform after changes means you accept the new terms.",
        bullets: &[],
    },
];

#[component]
fn StaticPage(title: &'static str, sections: &'static [Section]) -> impl IntoView {
    view! {
        <div class="mx-auto max-w-4xl px-4 py-12">
            <h1 class="mb-8 text-4xl font-bold text-foreground">{title}</h1>
            <Card>
                <CardContent class="space-y-8">
                    {sections
                        .iter()
                        .map(|s| {
                            view! {
                                <section class="space-y-3">
                                    <h2 class="text-2xl font-semibold">{s.title}</h2>
                                    <Show when=move || !s.body.is_empty()>
                                        <p class="text-muted-foreground">{s.body}</p>
                                    </Show>
                                    <ul class="list-disc space-y-1 pl-6 text-muted-foreground">
                                        {s.bullets.iter().map(|b| view! { <li>{*b}</li> }).collect_view()}
                                    </ul>
                                </section>
                            }
                        })
                        .collect_view()}
                </CardContent>
            </Card>
        </div>
    }
}

#[component]
pub fn AboutPage() -> impl IntoView {
    view! { <StaticPage title="About Padhai Co" sections=ABOUT /> }
}

#[component]
pub fn PrivacyPage() -> impl IntoView {
    view! { <StaticPage title="Privacy Policy" sections=PRIVACY /> }
}

#[component]
pub fn TermsPage() -> impl IntoView {
    view! { <StaticPage title="Terms and Conditions" sections=TERMS /> }
}
