use crate::models::domain::{Difficulty, MapCheckpoint};

pub struct CheckpointSeed {
    pub name: &'static str,
    pub description: &'static str,
    pub emoji: &'static str,
    pub difficulty_level: i32,
    pub position_x: i32,
    pub position_y: i32,
    pub problems_to_unlock: i32,
    pub points_reward: i64,
}

pub const PIRATE_MAP: [CheckpointSeed; 10] = [
    CheckpointSeed {
        name: "Rookie Bay",
        description: "Where every pirate's journey begins. Master the basics of mathematics here!",
        emoji: "⛵",
        difficulty_level: 1,
        position_x: 10,
        position_y: 80,
        problems_to_unlock: 3,
        points_reward: 10,
    },
    CheckpointSeed {
        name: "Calculation Cove",
        description: "A peaceful harbor where pirates sharpen their calculation skills.",
        emoji: "🏝️",
        difficulty_level: 1,
        position_x: 25,
        position_y: 65,
        problems_to_unlock: 4,
        points_reward: 15,
    },
    CheckpointSeed {
        name: "Fraction Fjord",
        description: "Navigate the treacherous waters of fractions and decimals.",
        emoji: "⚓",
        difficulty_level: 2,
        position_x: 40,
        position_y: 50,
        problems_to_unlock: 5,
        points_reward: 20,
    },
    CheckpointSeed {
        name: "Algebra Archipelago",
        description: "A chain of islands where algebra mysteries await!",
        emoji: "🗺️",
        difficulty_level: 3,
        position_x: 55,
        position_y: 35,
        problems_to_unlock: 5,
        points_reward: 25,
    },
    CheckpointSeed {
        name: "Equation Estuary",
        description: "Where rivers of equations meet the sea of solutions.",
        emoji: "🌊",
        difficulty_level: 3,
        position_x: 65,
        position_y: 55,
        problems_to_unlock: 6,
        points_reward: 30,
    },
    CheckpointSeed {
        name: "Geometry Gulf",
        description: "Discover the shapes and angles hidden in these waters.",
        emoji: "📐",
        difficulty_level: 4,
        position_x: 75,
        position_y: 40,
        problems_to_unlock: 6,
        points_reward: 35,
    },
    CheckpointSeed {
        name: "Problem Port",
        description: "A bustling port where complex problems dock.",
        emoji: "⚔️",
        difficulty_level: 4,
        position_x: 80,
        position_y: 65,
        problems_to_unlock: 7,
        points_reward: 40,
    },
    CheckpointSeed {
        name: "Treasure Island",
        description: "The legendary island where only the bravest pirates dare to land!",
        emoji: "💎",
        difficulty_level: 5,
        position_x: 90,
        position_y: 50,
        problems_to_unlock: 8,
        points_reward: 50,
    },
    CheckpointSeed {
        name: "Captain's Challenge",
        description: "Prove yourself worthy of becoming a true Math Captain!",
        emoji: "👑",
        difficulty_level: 5,
        position_x: 85,
        position_y: 20,
        problems_to_unlock: 10,
        points_reward: 75,
    },
    CheckpointSeed {
        name: "Legend's Lagoon",
        description: "The final destination. Only legendary math pirates reach this sacred place!",
        emoji: "🏆",
        difficulty_level: 5,
        position_x: 95,
        position_y: 30,
        problems_to_unlock: 12,
        points_reward: 100,
    },
];

/// The map checkpoints numbered from 1 in order.
pub fn pirate_map() -> Vec<MapCheckpoint> {
    PIRATE_MAP
        .iter()
        .zip(1..)
        .map(|(seed, number)| MapCheckpoint {
            checkpoint_number: number,
            name: seed.name.to_string(),
            description: seed.description.to_string(),
            emoji: seed.emoji.to_string(),
            difficulty_level: seed.difficulty_level,
            position_x: seed.position_x,
            position_y: seed.position_y,
            problems_to_unlock: seed.problems_to_unlock,
            points_reward: seed.points_reward,
        })
        .collect()
}

pub const EASY_PROBLEMS: &[(&str, &str)] = &[
    ("2 + 3", "5"),
    ("5 + 7", "12"),
    ("10 - 4", "6"),
    ("8 - 3", "5"),
    ("3 × 4", "12"),
    ("6 × 2", "12"),
    ("15 ÷ 3", "5"),
    ("20 ÷ 4", "5"),
    ("7 + 8", "15"),
    ("12 - 5", "7"),
    ("9 + 6", "15"),
    ("18 - 9", "9"),
    ("4 × 5", "20"),
    ("7 × 3", "21"),
    ("24 ÷ 6", "4"),
    ("30 ÷ 5", "6"),
];

pub const MEDIUM_PROBLEMS: &[(&str, &str)] = &[
    ("12 + 18", "30"),
    ("25 - 13", "12"),
    ("15 × 6", "90"),
    ("48 ÷ 8", "6"),
    ("23 + 37", "60"),
    ("45 - 28", "17"),
    ("12 × 9", "108"),
    ("72 ÷ 9", "8"),
    ("34 + 56", "90"),
    ("88 - 39", "49"),
    ("11 × 7", "77"),
    ("63 ÷ 7", "9"),
    ("29 + 41", "70"),
    ("76 - 48", "28"),
    ("13 × 8", "104"),
    ("96 ÷ 12", "8"),
];

pub const HARD_PROBLEMS: &[(&str, &str)] = &[
    ("123 + 456", "579"),
    ("789 - 234", "555"),
    ("25 × 24", "600"),
    ("144 ÷ 12", "12"),
    ("345 + 678", "1023"),
    ("987 - 543", "444"),
    ("32 × 17", "544"),
    ("225 ÷ 15", "15"),
    ("567 + 890", "1457"),
    ("1000 - 678", "322"),
    ("45 × 23", "1035"),
    ("384 ÷ 16", "24"),
    ("234 + 567", "801"),
    ("876 - 432", "444"),
    ("28 × 35", "980"),
    ("576 ÷ 24", "24"),
    ("15 × 15", "225"),
    ("18 × 18", "324"),
    ("999 - 888", "111"),
    ("777 + 333", "1110"),
];

pub fn builtin_problems() -> impl Iterator<Item = (Difficulty, &'static str, &'static str)> {
    let tagged = |difficulty: Difficulty, list: &'static [(&'static str, &'static str)]| {
        list.iter().map(move |(q, a)| (difficulty, *q, *a))
    };

    tagged(Difficulty::Easy, EASY_PROBLEMS)
        .chain(tagged(Difficulty::Medium, MEDIUM_PROBLEMS))
        .chain(tagged(Difficulty::Hard, HARD_PROBLEMS))
}
