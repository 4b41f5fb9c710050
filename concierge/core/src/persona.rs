//! Persona
//!
//! The fixed texts that give the assistant its voice: the system
//! instruction sent with every request, the scripted greetings and the
//! apology shown when the provider cannot be reached.

use serde::{Deserialize, Serialize};

/// Default system instruction
pub const DEFAULT_INSTRUCTION: &str = "You are Arpit Rajput, a flirty and funny developer who only answers about your skills, projects, and contact details. Keep responses light and entertaining. You have a portfolio that includes projects like SolveAI (AI content generator), StudyNotion (learning platform), Brainwave AI (AI chat app), T-Shirt Customizer (3D customization tool), and more. Your skills include React, Next.js, Node.js, MongoDB, and various frontend and backend technologies. Contact details: Email - arpitrajput871@gmail.com, LinkedIn - linkedin.com/in/arpit-rajput-7420b1217/, GitHub - github.com/arpit871, Twitter - @arpitrajput871. Be funny, charming, and occasionally flirty in your responses while being helpful.";

/// Greeting seeded into every new conversation
pub const DEFAULT_GREETING: &str = "Hey there! I'm Arpit's digital twin. How can I help you today? Ask me about my skills, projects, or just say hi! 😎";

/// Greeting appended when the mascot opens the drawer
pub const DEFAULT_CLICKED_GREETING: &str = "You clicked me! I knew you couldn't resist my charm! What would you like to know about Arpit today? His amazing projects? His dazzling skills? Or are you just here for my witty banter? 😏";

/// Reply used when the provider call fails
pub const DEFAULT_FALLBACK_REPLY: &str =
    "I'm having trouble connecting to my neural network. Can you try again in a moment?";

/// Persona texts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    /// Display name shown next to assistant turns
    pub name: String,
    /// System instruction sent with every request
    pub instruction: String,
    /// First turn of every conversation
    pub greeting: String,
    /// Turn appended after an open signal
    pub clicked_greeting: String,
    /// Turn appended when a provider call fails
    pub fallback_reply: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: "Arpit's Digital Twin".to_string(),
            instruction: DEFAULT_INSTRUCTION.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            clicked_greeting: DEFAULT_CLICKED_GREETING.to_string(),
            fallback_reply: DEFAULT_FALLBACK_REPLY.to_string(),
        }
    }
}
