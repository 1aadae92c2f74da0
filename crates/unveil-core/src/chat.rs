//! Canned chat replies.
//!
//! Input is lower-cased and checked against each rule in table order; the
//! first rule with any keyword contained in the input wins, so rules with
//! short keywords that hide inside longer words ("ai" in "email") sit late.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub text: &'static str,
    pub follow_ups: &'static [&'static str],
}

struct Rule {
    keywords: &'static [&'static str],
    reply: ChatReply,
}

const RULES: &[Rule] = &[
    Rule {
        keywords: &["hire", "hiring", "job", "talk"],
        reply: ChatReply {
            text: "Moving fast, I like it.\n\n\
                   You want someone who can actually ship: code without tech-debt \
                   nightmares, marketing that is measured in revenue, and AI systems \
                   that survive production.",
            follow_ups: &["What are the skills?", "Show me the Malaysian platform"],
        },
    },
    Rule {
        keywords: &["skill", "stack", "tech"],
        reply: ChatReply {
            text: "Buckle up.\n\n\
                   • AI & automation: LLM APIs, n8n workflows that actually run\n\
                   • Marketing + tech: full-funnel campaigns with real analytics\n\
                   • Development: React, Python, JavaScript",
            follow_ups: &["Tell me about the AI stuff", "How do I get in touch?"],
        },
    },
    Rule {
        keywords: &["malaysia", "kopitiam", "mamak", "makcik"],
        reply: ChatReply {
            text: "The Malaysian platform runs in three layers:\n\n\
                   • Kopitiam Intel spots the cultural moment\n\
                   • Mamak Workshop writes in four languages\n\
                   • Makcik Approval checks tone, halal status and compliance\n\n\
                   Run `unveil play --script kopitiam-intel` to watch it.",
            follow_ups: &["Tell me about the AI stuff", "How do I get in touch?"],
        },
    },
    Rule {
        keywords: &["resume", "cv"],
        reply: ChatReply {
            text: "The resume has numbers, shipped projects and a working contact \
                   line. No three-page essays about passion for innovation.",
            follow_ups: &["How do I get in touch?"],
        },
    },
    Rule {
        keywords: &["email", "contact", "touch", "reach"],
        reply: ChatReply {
            text: "Email works best. Please skip the \"Dear Sir/Madam\"; this is not \
                   a letter to the tax office.",
            follow_ups: &["What are the skills?"],
        },
    },
    Rule {
        keywords: &["ai", "automation", "gpt", "llm"],
        reply: ChatReply {
            text: "Everyone claims they do AI now. This is the built kind:\n\n\
                   • API integrations with real error handling\n\
                   • Automation pipelines that run while you sleep (70% time saved)\n\
                   • Cultural context engines, not checkbox features",
            follow_ups: &["Show me the Malaysian platform", "What are the skills?"],
        },
    },
    Rule {
        keywords: &["thanks", "thank you", "terima kasih"],
        reply: ChatReply {
            text: "You're welcome! Anything else you want to know?",
            follow_ups: &[],
        },
    },
    Rule {
        keywords: &["hello", "hey", "selamat"],
        reply: ChatReply {
            text: "Hey hey!\n\nSo what brings you here? Hiring, curious, or \
                   procrastinating at work? No judgment.",
            follow_ups: &["What are the skills?", "I'm hiring"],
        },
    },
];

const FALLBACK: ChatReply = ChatReply {
    text: "Interesting question. I'm good, but not that good.\n\n\
           I can help with:\n\
           • Skills & tech expertise\n\
           • Project walkthroughs\n\
           • AI capabilities\n\
           • Getting in touch",
    follow_ups: &["What are the skills?", "Tell me about the AI stuff"],
};

/// Picks the canned reply for `text`.
pub fn respond(text: &str) -> ChatReply {
    let lowered = text.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k)))
        .map_or(FALLBACK, |rule| rule.reply.clone())
}
