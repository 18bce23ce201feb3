use once_cell::sync::Lazy;

/// First message the widget shows when it opens.
pub const GREETING: &str =
    "Hello! I'm Ritik's chatbot assistant. How can I help you today?";

/// Reply used when no rule matches.
pub const FALLBACK: &str = "I'm not sure how to respond to that. Can you try asking something \
     about Ritik's projects, skills, or how to contact him?";

/// One keyword→reply rule. A rule fires when any of its keywords occurs as a
/// substring of the lowercased message.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
}

/// Ordered rule table; the first match wins, so earlier rules take priority.
pub static SCRIPT: Lazy<Vec<Rule>> = Lazy::new(|| {
    vec![
        Rule {
            keywords: &["contact", "reach"],
            reply: "You can contact Ritik through the contact form on the Contact page or \
                 directly via email at contact@ritik.com.",
        },
        Rule {
            keywords: &["project", "work"],
            reply: "Ritik's projects can be found in the Projects section. There you'll see a \
                 variety of work ranging from web applications to mobile apps and more.",
        },
        Rule {
            keywords: &["tech", "technology", "stack"],
            reply: "Ritik works with a variety of technologies including React, NextJS, \
                 Node.js, Express, MongoDB, and more. Check out the About page for a \
                 complete list!",
        },
        Rule {
            keywords: &["resume"],
            reply: "You can view and download Ritik's resume from the Resume page.",
        },
        Rule {
            keywords: &["resources"],
            reply: "Ritik offers both free and premium resources. You'll need to login to \
                 access the premium resources.",
        },
        Rule {
            keywords: &["game", "fun"],
            reply: "Check out the Fun section for games like Tic Tac Toe, Snake and Memory \
                 Game!",
        },
        Rule {
            keywords: &["hello", "hi", "hey"],
            reply: "Hello there! How can I assist you today?",
        },
    ]
});

/// Pick the scripted reply for a visitor message.
pub fn reply(message: &str) -> &'static str {
    let message = message.to_lowercase();
    SCRIPT
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| message.contains(keyword)))
        .map(|rule| rule.reply)
        .unwrap_or(FALLBACK)
}
