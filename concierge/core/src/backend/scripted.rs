//! Scripted Provider
//!
//! Offline responder that answers from a fixed set of keyword rules. Used
//! when no API key is configured, for demos, and as a deterministic
//! provider in tests (with a zero delay).

use std::time::Duration;

use async_trait::async_trait;
use rand::seq::SliceRandom;

use super::traits::{ProviderError, ProviderRequest, ResponseProvider};

const PROJECTS_REPLY: &str = "I've built some seriously cool stuff! Check out SolveAI, my AI content generator, or StudyNotion, a comprehensive learning platform. I'm also proud of my 3D T-Shirt Customizer - it's like playing dress-up but way nerdier. Want to see my digital babies? They're all showcased in my portfolio above! 😉";

const SKILLS_REPLY: &str = "Oh, you want to know what I'm good at? *winks* I'm a full-stack magician with React, Node.js, and MongoDB as my main tricks. I can make frontends so pretty they'll make you blush, and backends so robust they never let you down. I'm also dipping my toes into AI and machine learning - teaching computers to be almost as charming as me! 🤖✨";

const CONTACT_REPLY: &str = "Trying to slide into my DMs, huh? I like your style! You can reach me at arpitrajput871@gmail.com or connect with me on LinkedIn. I promise I respond faster than my React components render! 📲";

const HELLO_REPLY: &str = "Well hello there, gorgeous! 👋 I'm Arpit, your friendly neighborhood code wizard. What brings you to my digital playground today? Looking for tech talk or just admiring my portfolio? Either way, I'm all yours! 😎";

const EXPERIENCE_REPLY: &str = "My career journey? It's been a wild ride! Started as a MERN stack teacher, showing others the ropes, then graduated with my Computer Science degree. Worked at a few product-based companies where I mastered data visualization and even created a WhatsApp messaging tool. Now I'm freelancing and loving the freedom to pick exciting projects. Want me to pick YOU as my next project? 😏";

const JOKE_TAIL: &str = " But seriously, the only thing buggier than my jokes is my first dating app attempt. Talk about unexpected behavior! 😂";

const JOKES: &[&str] = &[
    "Why don't programmers like nature? It has too many bugs and no debugging tool! 🐞",
    "Why did the JavaScript developer wear glasses? Because they couldn't C#! 👓",
    "How many programmers does it take to change a light bulb? None, that's a hardware problem! 💡",
    "Why was the JavaScript developer sad? Because they didn't know how to 'null' their feelings! 😢",
    "Why do Java developers wear glasses? Because they don't C#! 👀",
];

const DATING_REPLY: &str = "Are you flirting with an AI? I'm flattered! 💕 While I can't take you on a real date, I can definitely help you build an amazing dating app! Or maybe you're just practicing your pickup lines? Either way, I'm here for it! My relationship status is 'committed to code' but always open to chat! 😘";

const HOBBY_REPLY: &str = "When I'm not coding masterpieces? I love exploring new tech stacks, it's like going on blind dates but with less awkward small talk! I also enjoy gaming, hiking, and trying to convince my plants that my coding sessions aren't more important than watering them. Spoiler alert: they're not buying it! 🌱👨‍💻";

const ADVICE_REPLY: &str = "Want to become a developer like me? Start by learning the basics, build projects you're passionate about, and don't be afraid to break things! That's how we learn. Oh, and coffee. Lots and lots of coffee. It's not just a beverage, it's a development tool! ☕️ Remember, the best developers aren't those who never make errors, but those who know how to Google the best error messages! 😂";

const DEFAULT_REPLY: &str = "You've got my attention! I'm Arpit, full-stack developer extraordinaire, with a side of flirty humor. Ask me about my projects, skills, or how to reach me! Or just chat - I'm programmed to be entertaining! 💻✨";

/// Topic matched by a keyword rule
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Topic {
    Projects,
    Skills,
    Contact,
    Hello,
    Experience,
    Joke,
    Dating,
    Hobby,
    Advice,
    Other,
}

/// Rules are checked in order; the first match wins
const RULES: &[(&[&str], Topic)] = &[
    (&["project", "work"], Topic::Projects),
    (&["skill", "tech", "code"], Topic::Skills),
    (&["contact", "email", "reach"], Topic::Contact),
    (&["hello", "hi", "hey"], Topic::Hello),
    (&["experience", "background"], Topic::Experience),
    (&["joke", "funny"], Topic::Joke),
    (&["date", "single", "relationship"], Topic::Dating),
    (&["hobby", "free time"], Topic::Hobby),
    (&["learn", "advice"], Topic::Advice),
];

fn classify(message: &str) -> Topic {
    let lower = message.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map_or(Topic::Other, |(_, topic)| *topic)
}

/// Keyword-based offline provider
#[derive(Clone, Debug)]
pub struct ScriptedProvider {
    /// Simulated thinking time before replying
    delay: Duration,
}

impl ScriptedProvider {
    /// Create a provider that waits `delay` before each reply
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Create a provider that replies immediately
    #[must_use]
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Reply to `message` without waiting
    #[must_use]
    pub fn reply_to(message: &str) -> String {
        match classify(message) {
            Topic::Projects => PROJECTS_REPLY.to_string(),
            Topic::Skills => SKILLS_REPLY.to_string(),
            Topic::Contact => CONTACT_REPLY.to_string(),
            Topic::Hello => HELLO_REPLY.to_string(),
            Topic::Experience => EXPERIENCE_REPLY.to_string(),
            Topic::Joke => {
                let joke = JOKES.choose(&mut rand::thread_rng()).unwrap_or(&JOKES[0]);
                format!("{joke}{JOKE_TAIL}")
            }
            Topic::Dating => DATING_REPLY.to_string(),
            Topic::Hobby => HOBBY_REPLY.to_string(),
            Topic::Advice => ADVICE_REPLY.to_string(),
            Topic::Other => DEFAULT_REPLY.to_string(),
        }
    }
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl ResponseProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "Scripted"
    }

    async fn generate(&self, request: &ProviderRequest) -> Result<String, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Self::reply_to(&request.message))
    }
}
