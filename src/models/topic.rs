use rand::seq::SliceRandom;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct TopicCategory {
    pub name: &'static str,
    pub topics: &'static [&'static str],
}

pub const GRAMMAR_TOPICS: &[TopicCategory] = &[
    TopicCategory {
        name: "Basic Concepts",
        topics: &[
            "Word definition criteria",
            "Sentence: Definition & Types",
            "Parts of Speech Overview",
        ],
    },
    TopicCategory {
        name: "Parts of Speech",
        topics: &[
            "Noun: Definition & types",
            "Pronoun: Definition & Types",
            "Adjective: Definition & Types",
            "Verb: Definition & Types",
            "Adverb: Definition & Types",
            "Preposition: definition & Types",
            "Conjunction: Definition & Types",
            "Interjection: Definition & Types",
            "Article: Definition & Types",
        ],
    },
    TopicCategory {
        name: "Tenses",
        topics: &[
            "Present Tense: Definition & Structure",
            "Past Tense: Definition & Structure",
            "Future Tense: Definition & Structure",
            "Present Simple (Indefinite) Tense",
            "Present Progressive (Continuous) Tense",
            "Present Perfect Tense",
            "Present Perfect Progressive Tense",
            "Past Simple Tense",
            "Past Progressive Tense",
            "Past Perfect Tense",
            "Future Simple Tense",
            "Future Progressive Tense",
            "Future Perfect Tense",
        ],
    },
    TopicCategory {
        name: "Advanced Grammar",
        topics: &[
            "Clauses: Definition and Types",
            "Conditionals: Definition and Types",
            "Modal Auxiliaries",
            "Subject Verb Agreement: Rules",
            "Transformation of sentences",
            "Punctuation: Definition, Types & Usage Rules",
        ],
    },
];

pub fn is_known_topic(topic: &str) -> bool {
    GRAMMAR_TOPICS
        .iter()
        .any(|category| category.topics.contains(&topic))
}

/// Prompts for free speaking or writing practice.
pub const PRACTICE_TOPICS: &[&str] = &[
    "Is online education better than traditional education?",
    "Future of electric vehicles",
    "Social media: Connecting or isolating people?",
    "Cryptocurrency: Hype or future?",
    "Space exploration: Worth the cost?",
    "The impact of globalization on culture",
    "Should plastic be completely banned?",
    "Is remote work the future?",
    "Privacy vs Security in the digital age",
    "Role of youth in nation-building",
    "Can renewable energy replace fossil fuels?",
    "Impact of Artificial Intelligence on healthcare",
    "Is social media a reliable source of news?",
    "The importance of financial literacy",
    "Will robots replace humans in jobs?",
    "Importance of physical fitness in daily life",
    "Can gaming be a career option?",
    "Does technology make life easier or complicated?",
    "Effects of fast food on health",
    "Does social media influence elections?",
    "Impact of automation on employment",
    "Importance of gender equality in society",
    "Should voting be made mandatory?",
    "Is climate change reversible?",
    "Impact of digital payments on society",
    "Role of media in shaping public opinion",
    "Importance of work-life balance",
    "Do video games promote violence?",
    "Is time travel possible?",
    "Can money buy happiness?",
    "Impact of movies on society",
    "Is artificial intelligence a threat to humanity?",
    "Should education be free for all?",
    "Does technology disconnect us from nature?",
    "Is space tourism ethical?",
    "The rise of influencer marketing",
    "Impact of fast fashion on the environment",
    "Should animal testing be banned?",
    "Importance of cybersecurity awareness",
    "Is nuclear energy a sustainable option?",
    "Are self-driving cars safe?",
    "Should junk food advertisements be banned?",
    "Impact of virtual reality on society",
    "Should social media have age restrictions?",
    "The future of online shopping",
    "Is technology making us lazy?",
    "Should we colonize Mars?",
];

pub fn random_practice_topic() -> &'static str {
    PRACTICE_TOPICS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lookup_is_exact() {
        assert!(is_known_topic("Modal Auxiliaries"));
        assert!(!is_known_topic("modal auxiliaries"));
    }

    #[test]
    fn random_practice_topic_comes_from_the_list() {
        for _ in 0..10 {
            assert!(PRACTICE_TOPICS.contains(&random_practice_topic()));
        }
    }
}
