use std::fmt;

use serde::{Deserialize, Serialize};

/// Animals searched on every run, in processing order.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    // Domestic pets
    "dog", "cat", "rabbit", "hamster", "guinea pig", "ferret", "mouse", "rat", "gerbil", "chinchilla",
    "hedgehog", "sugar glider", "turtle", "tortoise", "parrot", "budgie", "cockatiel", "canary", "goldfish", "betta fish",
    // Farm animals
    "chicken", "cow", "pig", "sheep", "goat", "horse", "donkey", "duck", "goose", "turkey", "llama", "alpaca", "buffalo", "ox",
    // Wild mammals
    "lion", "tiger", "elephant", "giraffe", "zebra", "bear", "wolf", "fox", "deer", "moose", "kangaroo", "koala", "panda",
    "cheetah", "leopard", "jaguar", "rhinoceros", "hippopotamus", "gorilla", "chimpanzee", "monkey", "squirrel", "raccoon",
    "skunk", "bat", "otter", "beaver", "badger", "weasel", "coyote", "bobcat", "lynx", "walrus", "seal", "whale", "dolphin",
    // Birds
    "eagle", "hawk", "owl", "sparrow", "robin", "cardinal", "blue jay", "crow", "raven", "pigeon", "dove", "peacock",
    "flamingo", "penguin", "ostrich", "emu", "hummingbird", "woodpecker", "seagull", "swan",
    // Reptiles & amphibians
    "snake", "lizard", "crocodile", "alligator", "frog", "toad", "salamander", "iguana", "chameleon", "gecko",
    // Aquatic animals
    "shark", "octopus", "squid", "jellyfish", "starfish", "seahorse", "crab", "lobster", "shrimp", "clownfish",
    // Insects & arachnids
    "butterfly", "bee", "ant", "spider", "ladybug", "grasshopper", "cricket", "dragonfly", "moth", "beetle",
];

/// A search term that doubles as a storage folder name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The raw label, used as the search query and in file names.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Folder name: first character upper-cased, the rest lower-cased
    /// (`"guinea pig"` → `"Guinea pig"`).
    pub fn display_name(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
            None => String::new(),
        }
    }

    /// Name of the uploaded file for one search hit.
    pub fn file_name(&self, external_id: i64) -> String {
        format!("{}_{}.jpg", self.0, external_id)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a comma-separated category list, dropping blank entries.
pub fn parse_categories(raw: &str) -> Vec<Category> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Category::new)
        .collect()
}
