// Static game data backing the domain vocabulary
//
// Every identifier the synthesizer may emit lives in these tables, together
// with the phrases that resolve to it and the lexical cues the local
// generator reacts to. Extending the vocabulary is a change to this file only.

/// One known entity: canonical identifier plus extra phrases
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub id: &'static str,
    pub aliases: &'static [&'static str],
    /// When false, prompts only reach this entity through its aliases.
    /// Validation of AI output still accepts the identifier itself.
    pub match_name: bool,
    /// Name reads as plain English ("the order"); prompts must capitalize it
    pub proper: bool,
}

const fn e(id: &'static str, aliases: &'static [&'static str]) -> Entry {
    Entry {
        id,
        aliases,
        match_name: true,
        proper: false,
    }
}

const fn quiet(id: &'static str, aliases: &'static [&'static str]) -> Entry {
    Entry {
        id,
        aliases,
        match_name: false,
        proper: false,
    }
}

const fn proper(id: &'static str, aliases: &'static [&'static str]) -> Entry {
    Entry {
        id,
        aliases,
        match_name: true,
        proper: true,
    }
}

pub const DEFAULT_DECK: &str = "Red Deck";

/// Highest ante a preference may name (endless mode included)
pub const MAX_ANTE: u8 = 39;

pub const DECKS: &[Entry] = &[
    e("Red Deck", &[]),
    e("Blue Deck", &[]),
    e("Yellow Deck", &[]),
    e("Green Deck", &[]),
    e("Black Deck", &[]),
    e("Magic Deck", &[]),
    e("Nebula Deck", &["nebula"]),
    e("Ghost Deck", &[]),
    e("Abandoned Deck", &["abandoned"]),
    e("Checkered Deck", &["checkered", "checkerboard deck"]),
    e("Zodiac Deck", &["zodiac"]),
    e("Painted Deck", &[]),
    e("Anaglyph Deck", &["anaglyph"]),
    e("Plasma Deck", &["plasma"]),
    e("Erratic Deck", &["erratic"]),
];

pub const JOKERS: &[Entry] = &[
    quiet("Joker", &["base joker", "plain joker", "regular joker", "vanilla joker"]),
    e("Greedy Joker", &[]),
    e("Lusty Joker", &[]),
    e("Wrathful Joker", &[]),
    e("Gluttonous Joker", &[]),
    e("Jolly Joker", &[]),
    e("Zany Joker", &[]),
    e("Mad Joker", &[]),
    e("Crazy Joker", &[]),
    e("Droll Joker", &[]),
    e("Sly Joker", &[]),
    e("Wily Joker", &[]),
    e("Clever Joker", &[]),
    e("Devious Joker", &[]),
    e("Crafty Joker", &[]),
    e("Half Joker", &[]),
    e("Joker Stencil", &["stencil"]),
    e("Four Fingers", &[]),
    e("Mime", &[]),
    e("Credit Card", &[]),
    e("Ceremonial Dagger", &["dagger"]),
    e("Banner", &[]),
    e("Mystic Summit", &[]),
    e("Marble Joker", &[]),
    e("Loyalty Card", &[]),
    e("8 Ball", &["eight ball"]),
    e("Misprint", &[]),
    e("Dusk", &[]),
    e("Raised Fist", &[]),
    e("Chaos the Clown", &["chaos"]),
    e("Fibonacci", &[]),
    e("Steel Joker", &[]),
    e("Scary Face", &[]),
    e("Abstract Joker", &["abstract"]),
    e("Delayed Gratification", &["delayed grat"]),
    e("Hack", &[]),
    e("Pareidolia", &[]),
    e("Gros Michel", &[]),
    e("Even Steven", &[]),
    e("Odd Todd", &[]),
    e("Scholar", &[]),
    e("Business Card", &[]),
    e("Supernova", &[]),
    e("Ride the Bus", &[]),
    e("Space Joker", &[]),
    e("Egg", &[]),
    e("Burglar", &[]),
    e("Blackboard", &[]),
    e("Runner", &[]),
    e("Ice Cream", &[]),
    e("DNA", &[]),
    e("Splash", &[]),
    e("Blue Joker", &[]),
    e("Sixth Sense", &[]),
    e("Constellation", &[]),
    e("Hiker", &[]),
    e("Faceless Joker", &[]),
    e("Green Joker", &[]),
    e("Superposition", &[]),
    e("To Do List", &["todo list", "to-do list"]),
    e("Cavendish", &[]),
    e("Card Sharp", &[]),
    e("Red Card", &[]),
    e("Madness", &[]),
    e("Square Joker", &[]),
    e("Seance", &[]),
    e("Riff-Raff", &["riffraff"]),
    e("Vampire", &[]),
    e("Shortcut", &[]),
    e("Hologram", &[]),
    e("Vagabond", &[]),
    e("Baron", &[]),
    e("Cloud 9", &["cloud nine"]),
    e("Rocket", &[]),
    e("Obelisk", &[]),
    e("Midas Mask", &["midas"]),
    e("Luchador", &[]),
    e("Photograph", &["photo"]),
    e("Gift Card", &[]),
    e("Turtle Bean", &[]),
    e("Erosion", &[]),
    e("Reserved Parking", &[]),
    e("Mail-In Rebate", &["mail rebate"]),
    e("To the Moon", &[]),
    e("Hallucination", &[]),
    e("Fortune Teller", &[]),
    e("Juggler", &[]),
    e("Drunkard", &[]),
    e("Stone Joker", &[]),
    e("Golden Joker", &[]),
    e("Lucky Cat", &[]),
    e("Baseball Card", &[]),
    e("Bull", &[]),
    e("Diet Cola", &[]),
    e("Trading Card", &[]),
    e("Flash Card", &[]),
    e("Popcorn", &[]),
    e("Spare Trousers", &[]),
    e("Ancient Joker", &[]),
    e("Ramen", &[]),
    e("Walkie Talkie", &[]),
    e("Seltzer", &[]),
    e("Castle", &[]),
    e("Smiley Face", &[]),
    e("Campfire", &[]),
    e("Golden Ticket", &[]),
    e("Mr. Bones", &["mister bones"]),
    e("Acrobat", &[]),
    e("Sock and Buskin", &[]),
    e("Swashbuckler", &[]),
    e("Troubadour", &[]),
    e("Certificate", &[]),
    e("Smeared Joker", &["smeared"]),
    e("Throwback", &[]),
    e("Hanging Chad", &[]),
    e("Rough Gem", &[]),
    e("Bloodstone", &[]),
    e("Arrowhead", &[]),
    e("Onyx Agate", &[]),
    e("Glass Joker", &[]),
    e("Showman", &["ring master", "ringmaster"]),
    e("Flower Pot", &[]),
    e("Blueprint", &["bp"]),
    e("Wee Joker", &[]),
    e("Merry Andy", &[]),
    e("Oops! All 6s", &["oops all sixes", "oops all 6"]),
    e("The Idol", &["idol"]),
    e("Seeing Double", &[]),
    e("Matador", &[]),
    e("Hit the Road", &[]),
    proper("The Duo", &[]),
    proper("The Trio", &[]),
    proper("The Family", &[]),
    proper("The Order", &[]),
    proper("The Tribe", &[]),
    e("Stuntman", &[]),
    e("Invisible Joker", &["invisible", "invis"]),
    e("Brainstorm", &[]),
    e("Satellite", &[]),
    e("Shoot the Moon", &[]),
    e("Driver's License", &["drivers licence"]),
    e("Cartomancer", &[]),
    e("Astronomer", &[]),
    e("Burnt Joker", &["burnt"]),
    e("Bootstraps", &[]),
    e("Canio", &["caino"]),
    e("Triboulet", &[]),
    e("Yorick", &[]),
    e("Chicot", &[]),
    e("Perkeo", &[]),
];

/// Editions double as joker modifiers, so their identifiers are lowercase
pub const EDITIONS: &[Entry] = &[
    e("foil", &["foiled"]),
    e("holographic", &["holo"]),
    e("polychrome", &["poly"]),
    e("negative", &["neg", "negatives"]),
];

/// Stickers only ever qualify a joker; they are never criteria of their own
pub const STICKERS: &[Entry] = &[
    e("eternal", &[]),
    e("perishable", &[]),
    e("rental", &[]),
];

pub const SEALS: &[Entry] = &[
    e("Gold Seal", &["gold seals"]),
    e("Red Seal", &["red seals"]),
    e("Blue Seal", &["blue seals"]),
    e("Purple Seal", &["purple seals"]),
];

pub const TAGS: &[Entry] = &[
    e("Uncommon Tag", &[]),
    e("Rare Tag", &[]),
    e("Negative Tag", &["neg tag"]),
    e("Foil Tag", &[]),
    e("Holographic Tag", &["holo tag"]),
    e("Polychrome Tag", &["poly tag"]),
    e("Investment Tag", &[]),
    e("Voucher Tag", &[]),
    e("Boss Tag", &[]),
    e("Standard Tag", &[]),
    e("Charm Tag", &[]),
    e("Meteor Tag", &[]),
    e("Buffoon Tag", &[]),
    e("Handy Tag", &[]),
    e("Garbage Tag", &[]),
    e("Ethereal Tag", &[]),
    e("Coupon Tag", &[]),
    e("Double Tag", &[]),
    e("Juggle Tag", &[]),
    e("D6 Tag", &["d6"]),
    e("Top-up Tag", &["topup tag"]),
    e("Speed Tag", &[]),
    e("Orbital Tag", &[]),
    e("Economy Tag", &["econ tag"]),
];

pub const VOUCHERS: &[Entry] = &[
    e("Overstock", &[]),
    e("Overstock Plus", &[]),
    e("Clearance Sale", &[]),
    e("Liquidation", &[]),
    e("Hone", &[]),
    e("Glow Up", &[]),
    e("Reroll Surplus", &[]),
    e("Reroll Glut", &[]),
    e("Crystal Ball", &[]),
    e("Omen Globe", &[]),
    e("Telescope", &[]),
    e("Observatory", &[]),
    e("Grabber", &[]),
    e("Nacho Tong", &[]),
    e("Wasteful", &[]),
    e("Recyclomancy", &[]),
    e("Tarot Merchant", &[]),
    e("Tarot Tycoon", &[]),
    e("Planet Merchant", &[]),
    e("Planet Tycoon", &[]),
    e("Seed Money", &[]),
    e("Money Tree", &[]),
    e("Blank", &["blank voucher"]),
    e("Antimatter", &[]),
    e("Magic Trick", &[]),
    e("Illusion", &[]),
    e("Hieroglyph", &[]),
    e("Petroglyph", &[]),
    e("Director's Cut", &[]),
    e("Retcon", &[]),
    e("Paint Brush", &["paintbrush"]),
    e("Palette", &[]),
];

/// Coarse keyword classes for wishes that name no concrete entity
pub const OTHER: &[Entry] = &[
    e(
        "economy",
        &["money", "cash", "econ", "dollars", "interest", "rich", "income"],
    ),
    e(
        "legendary",
        &["legendaries", "legendary joker", "legendary jokers", "the soul"],
    ),
    e("spectral", &["spectrals", "spectral pack", "spectral cards"]),
    e("tarot", &["tarots", "tarot cards", "arcana pack"]),
    e("planet", &["planets", "planet cards", "celestial pack"]),
    e("scaling", &["scaler", "scalers", "scale"]),
    e("retrigger", &["retriggers", "retriggering"]),
    e("xmult", &["x mult", "times mult", "mult multiplier"]),
];

/// Hedging phrases: mentions in the same segment become preferences
pub const HEDGE_CUES: &[&str] = &[
    "maybe",
    "ideally",
    "if possible",
    "lots of",
    "a lot of",
    "plenty of",
    "would like",
    "id like",
    "prefer",
    "preferably",
    "hopefully",
    "nice to have",
    "would be nice",
    "optional",
    "optionally",
    "bonus",
    "perhaps",
    "possibly",
    "if you can",
];

/// Explicit mandatory phrasing; beats any hedge in the same segment
pub const MANDATORY_CUES: &[&str] = &[
    "must",
    "must have",
    "need",
    "needs",
    "require",
    "requires",
    "required",
    "guaranteed",
    "guarantee",
    "definitely",
    "has to",
    "have to",
    "mandatory",
];

/// Exclusions: the mentions that follow are dropped, never searched for
pub const NEGATION_CUES: &[&str] = &[
    "no",
    "not",
    "nor",
    "without",
    "avoid",
    "except",
    "excluding",
    "never",
    "dont want",
    "do not want",
    "dont need",
    "do not need",
    "rather not",
];

/// Conjunctions: close the segment but continue the previous clause, so a
/// hedge or mandatory cue before them still applies
pub const CONJUNCTION_CUES: &[&str] = &["and", "plus", "also", "or", "as well as", "then"];

/// Clause openers: close the segment and reset its classification
pub const CLAUSE_CUES: &[&str] = &["with", "featuring", "including", "having", "but"];

pub const ANTE_CUES: &[&str] = &["ante", "antes"];

/// Words joining the two bounds of "ante N to M"
pub const ANTE_RANGE_WORDS: &[&str] = &["to", "through", "thru", "til"];

/// Words that turn a following "ante N" into "antes 1 through N"
pub const ANTE_BOUND_CUES: &[&str] = &["by", "before", "within", "until"];

/// Timing words with a fixed ante range: (phrase, min, max)
pub const TIMING_CUES: &[(&str, u8, u8)] = &[
    ("early", 1, 2),
    ("early on", 1, 2),
    ("asap", 1, 2),
    ("first shop", 1, 1),
    ("first ante", 1, 1),
    ("right away", 1, 1),
    ("immediately", 1, 1),
];

/// Words too generic to resolve on their own, even through fallbacks
pub const GENERIC_WORDS: &[&str] = &[
    "joker", "jokers", "seed", "seeds", "deck", "decks", "card", "cards", "tag", "tags",
    "voucher", "vouchers", "edition", "editions", "seal", "seals", "run", "runs", "game",
    "games", "sticker", "stickers",
];

pub const NUMBER_WORDS: &[(&str, u8)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("first", 1),
    ("second", 2),
    ("third", 3),
];
