//! The startup idea game: three decks, one card drawn from each per spin.

use rand::Rng;
use serde::Serialize;

pub const TARGET_AUDIENCES: &[&str] = &[
    "College Students",
    "Working Professionals",
    "Stay-at-home Parents",
    "Senior Citizens",
    "Small Business Owners",
    "Freelancers",
    "Gamers",
    "Fitness Enthusiasts",
    "Teachers",
    "Healthcare Workers",
    "Farmers",
    "Artists & Creators",
    "Restaurant Owners",
    "NGOs",
    "E-commerce Sellers",
    "Real Estate Agents",
    "Event Planners",
    "Pet Owners",
    "Travelers",
    "Remote Workers",
    "Gen Z Consumers",
    "Homemakers",
    "Factory Workers",
    "Delivery Drivers",
    "Content Creators",
    "Music Artists",
    "Sports Coaches",
];

pub const PAIN_POINTS: &[&str] = &[
    "Time Management",
    "High Costs",
    "Lack of Trust",
    "Information Overload",
    "Poor Customer Service",
    "Difficulty Finding Jobs",
    "Mental Health Struggles",
    "Language Barriers",
    "Complex Regulations",
    "Loneliness & Isolation",
    "Skill Gaps",
    "Cash Flow Problems",
    "Marketing Challenges",
    "Data Security",
    "Work-Life Balance",
    "Health Tracking",
    "Education Access",
    "Networking",
    "Document Management",
    "Communication Gaps",
    "Quality Control",
    "Hiring Talent",
    "Customer Retention",
    "Product Discovery",
    "Decision Fatigue",
];

pub const TECH_TOOLS: &[&str] = &[
    "AI Chatbots",
    "WhatsApp Automation",
    "Mobile App",
    "SaaS Platform",
    "Blockchain",
    "AR/VR",
    "Voice Assistants",
    "No-Code Tools",
    "API Marketplace",
    "Subscription Model",
    "IoT Sensors",
    "Machine Learning",
    "Computer Vision",
    "NLP Processing",
    "Cloud Computing",
    "Edge Computing",
    "5G Networks",
    "Digital Twins",
    "Smart Contracts",
    "Recommendation Engine",
    "Data Analytics",
    "Robotic Process Automation",
    "Geolocation Services",
    "Payment Gateway",
    "Video Streaming",
    "Social Commerce",
    "Gamification",
];

/// Words that ask for a new spin (English and Hinglish).
pub const SPIN_KEYWORDS: &[&str] = &["spin", "start", "play", "new game", "shuru", "chalo"];

/// One card from each deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameCardTriple {
    pub audience: String,
    pub pain_point: String,
    pub technology: String,
}

impl GameCardTriple {
    /// Draw one card per deck, uniformly and independently.
    ///
    /// There is no memory of earlier spins; repeats across turns are fine.
    pub fn spin<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            audience: draw(TARGET_AUDIENCES, rng),
            pain_point: draw(PAIN_POINTS, rng),
            technology: draw(TECH_TOOLS, rng),
        }
    }

    /// Prefix a user message with the structured spin annotation.
    pub fn annotate(&self, message: &str) -> String {
        format!(
            "[GAME SPIN - Audience: {}, Problem: {}, Tech: {}]\n\nUser message: {message}",
            self.audience, self.pain_point, self.technology
        )
    }
}

fn draw<R: Rng + ?Sized>(deck: &[&str], rng: &mut R) -> String {
    deck[rng.gen_range(0..deck.len())].to_string()
}

/// Whether the latest user message asks for a spin.
pub fn is_spin_request(text: &str) -> bool {
    let lowered = text.to_lowercase();
    SPIN_KEYWORDS.iter().any(|k| lowered.contains(k))
}
