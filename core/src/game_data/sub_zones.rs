//! Sub-zone identification data
//!
//! Sub-zones are the named areas inside a duty, usually one per boss arena.
//! The world feed reports the current sub-zone ID; these tables turn it into
//! something readable for logs and the validator's output.

use phf::phf_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubZoneInfo {
    pub dungeon: &'static str,
    pub name: &'static str,
    /// Boss fought here (if any)
    pub boss: Option<&'static str>,
}

impl SubZoneInfo {
    const fn new(dungeon: &'static str, name: &'static str, boss: Option<&'static str>) -> Self {
        Self {
            dungeon,
            name,
            boss,
        }
    }
}

/// Look up a sub-zone by ID
pub fn lookup_sub_zone(sub_zone_id: u32) -> Option<&'static SubZoneInfo> {
    SUB_ZONES.get(&sub_zone_id)
}

/// Sub-zone table indexed by sub-zone ID
pub static SUB_ZONES: phf::Map<u32, SubZoneInfo> = phf_map! {
    // ─── The Thousand Maws of Toto-Rak (Lv. 32) ───
    523u32 => SubZoneInfo::new("The Thousand Maws of Toto-Rak", "Confession Chamber", Some("Coeurl O' Nine Tails")),
    522u32 => SubZoneInfo::new("The Thousand Maws of Toto-Rak", "The Fool's Rest", Some("Coeurl O' Nine Tails - Part 2")),
    612u32 => SubZoneInfo::new("The Thousand Maws of Toto-Rak", "Abacination Chamber", Some("Graffias")),

    // ─── Brayflox's Longstop (Lv. 32) ───
    689u32 => SubZoneInfo::new("Brayflox's Longstop", "Longstop Frontblock", Some("Hellbender")),

    // ─── The Stone Vigil (Lv. 41) ───
    877u32 => SubZoneInfo::new("The Stone Vigil", "The Barbican", Some("Chudo-Yudo")),
    878u32 => SubZoneInfo::new("The Stone Vigil", "The Right Brattice", Some("Koshchei")),
    879u32 => SubZoneInfo::new("The Stone Vigil", "The Strongroom", Some("Isgebind")),

    // ─── Dzemael Darkhold (Lv. 44) ───
    808u32 => SubZoneInfo::new("Dzemael Darkhold", "Grand Hall", Some("All-Seeing Eye")),
    810u32 => SubZoneInfo::new("Dzemael Darkhold", "Feasting Hall", Some("Taulurd")),
    812u32 => SubZoneInfo::new("Dzemael Darkhold", "Altar to Saint Daniffen", Some("Batraal")),

    // ─── Pharos Sirius (Lv. 50) ───
    928u32 => SubZoneInfo::new("Pharos Sirius", "Second Spire", Some("Symond the Unsinkable")),
    929u32 => SubZoneInfo::new("Pharos Sirius", "Fuel Chamber", Some("Zu")),
    930u32 => SubZoneInfo::new("Pharos Sirius", "Aether Compressor", Some("Tyrant")),
    931u32 => SubZoneInfo::new("Pharos Sirius", "Beacon Chamber", Some("Siren")),

    // ─── Keeper of the Lake (Lv. 50) ───
    1503u32 => SubZoneInfo::new("Keeper of the Lake", "Agrius Hull", Some("Einhander")),
    1505u32 => SubZoneInfo::new("Keeper of the Lake", "Ceruleum Spill", Some("Magitek Gunship")),
    1507u32 => SubZoneInfo::new("Keeper of the Lake", "The Forsworn Promise", Some("Midgardsormr")),

    // ─── The Copperbell Mines (Hard) (Lv. 50) ───
    679u32 => SubZoneInfo::new("The Copperbell Mines (Hard)", "The Screaming Dark", Some("Hecatoncheir Mastermind")),
    680u32 => SubZoneInfo::new("The Copperbell Mines (Hard)", "The Crying Dark", Some("Gogmagolem")),
    681u32 => SubZoneInfo::new("The Copperbell Mines (Hard)", "The Cold Throne", Some("Ouranos")),

    // ─── The Aery (Lv. 55) ───
    1577u32 => SubZoneInfo::new("The Aery", "Akh Fahl Lye", Some("Rangda")),
    1580u32 => SubZoneInfo::new("The Aery", "Ten Oohr", Some("Gyascutus")),
    1582u32 => SubZoneInfo::new("The Aery", "Nidhogg An", Some("Nidhogg")),

    // ─── The Vault (Lv. 57) ───
    1570u32 => SubZoneInfo::new("The Vault", "The Quire", Some("Ser Adelphel")),
    1571u32 => SubZoneInfo::new("The Vault", "Chapter House", Some("Ser Grinnaux")),
    1572u32 => SubZoneInfo::new("The Vault", "The Chancel", Some("Ser Charibert")),

    // ─── The Great Gubal Library (Lv. 59) ───
    1623u32 => SubZoneInfo::new("The Great Gubal Library", "Hall of Magicks", Some("Demon Tome")),
    1624u32 => SubZoneInfo::new("The Great Gubal Library", "Astrology and Astromancy Camera", Some("Byblos")),
    1625u32 => SubZoneInfo::new("The Great Gubal Library", "Rhapsodies Quadrangle", None),

    // ─── Baelsar's Wall (Lv. 60) ───
    1862u32 => SubZoneInfo::new("Baelsar's Wall", "Via Praetoria", Some("Magitek Predator")),
    1863u32 => SubZoneInfo::new("Baelsar's Wall", "Magitek Installation", Some("Armored Weapon")),
    1864u32 => SubZoneInfo::new("Baelsar's Wall", "Airship Landing", Some("Ser Charibert")),

    // ─── Aetherochemical Research Facility (Lv. 60) ───
    1598u32 => SubZoneInfo::new("Aetherochemical Research Facility", "Analysis and Proving", Some("Regula van Hydrus")),
    1599u32 => SubZoneInfo::new("Aetherochemical Research Facility", "Evaluation and Authentication", Some("Harmachis")),
    1602u32 => SubZoneInfo::new("Aetherochemical Research Facility", "Neurolink Nacelle", Some("Lahabrea + Igeyorhm")),

    // ─── Sirensong Sea (Lv. 61) ───
    1961u32 => SubZoneInfo::new("Sirensong Sea", "Spae Rock", Some("Lugat")),
    1963u32 => SubZoneInfo::new("Sirensong Sea", "Glowering Krautz", Some("The Governor")),
    1965u32 => SubZoneInfo::new("Sirensong Sea", "Warden's Delight", Some("Lorelei")),

    // ─── Alexander 1 (Lv. 60) ───
    1632u32 => SubZoneInfo::new("Alexander 1", "", None),

    // ─── Alexander 2 (Lv. 60) ───
    1637u32 => SubZoneInfo::new("Alexander 2", "", None),

    // ─── Alexander 3 (Lv. 60) ───
    1644u32 => SubZoneInfo::new("Alexander 3", "", None),

    // ─── Alexander 4 (Lv. 60) ───
    1645u32 => SubZoneInfo::new("Alexander 4", "", None),

    // ─── The Antitower (Lv. 60) ───
    1696u32 => SubZoneInfo::new("The Antitower", "The Manifest", Some("Zuro Roggo")),
    1697u32 => SubZoneInfo::new("The Antitower", "Where Hearts Leap", Some("Ziggy")),
    1698u32 => SubZoneInfo::new("The Antitower", "Where All Witness", Some("Calcabrina")),

    // ─── Sohr Khai (Lv. 60) ───
    1767u32 => SubZoneInfo::new("Sohr Khai", "Unsevered Despair", Some("Chieftain Moglin")),
    1768u32 => SubZoneInfo::new("Sohr Khai", "Unstifled Prayer", Some("Poqhiraj")),
    1769u32 => SubZoneInfo::new("Sohr Khai", "Shattered Remembrance", Some("Hraesvelgr")),

    // ─── Xelphatol (Lv. 60) ───
    1789u32 => SubZoneInfo::new("Xelphatol", "The Cage", Some("Nuzal Hueloc")),
    1790u32 => SubZoneInfo::new("Xelphatol", "The Tlachtli", Some("Dotoli Ciloc")),
    1791u32 => SubZoneInfo::new("Xelphatol", "The Vortex", Some("Tozol Huatotl")),

    // ─── Bardam's Mettle (Lv. 65) ───
    1976u32 => SubZoneInfo::new("Bardam's Mettle", "Bardam's Hunt", Some("Garula")),
    1977u32 => SubZoneInfo::new("Bardam's Mettle", "The Rebirth of Bardam the Brave", Some("Bardam's Trial")),
    1978u32 => SubZoneInfo::new("Bardam's Mettle", "The Rebirth of Bardam the Brave", Some("Bardam's Trial")),

    // ─── Doma Castle (Lv. 67) ───
    1985u32 => SubZoneInfo::new("Doma Castle", "The Third Armory", Some("Magitek Rearguard")),
    1986u32 => SubZoneInfo::new("Doma Castle", "Training Grounds", Some("Magitek Hexadron")),
    1987u32 => SubZoneInfo::new("Doma Castle", "Hall of the Scarlet Swallow", Some("Magitek Hexadron")),

    // ─── Castrum Abania (Lv. 69) ───
    1936u32 => SubZoneInfo::new("Castrum Abania", "Terrestrial Weaponry", Some("Magna Roader")),
    1937u32 => SubZoneInfo::new("Castrum Abania", "Project Aegis", Some("Subject Number XXIV")),
    1938u32 => SubZoneInfo::new("Castrum Abania", "Assessment Grounds", Some("Subject Number XXIV")),

    // ─── Ala Mhigo (Lv. 70) ───
    2289u32 => SubZoneInfo::new("Ala Mhigo", "Rhalgr's Gate", Some("Magitek Scorpion")),
    2290u32 => SubZoneInfo::new("Ala Mhigo", "The Chamber of Knowledge", Some("Aulus mal Asina")),

    // ─── Dohn Mheg (Lv. 73) ───
    2963u32 => SubZoneInfo::new("Dohn Mheg", "Teag Gye", Some("Lord of the Lingering Gaze")),
    2966u32 => SubZoneInfo::new("Dohn Mheg", "The Atelier", Some("Griaule")),
    2968u32 => SubZoneInfo::new("Dohn Mheg", "The Throne Room", Some("Lord of the Lengthsome Gait")),

    // ─── Mt. Gulg (Lv. 79) ───
    2998u32 => SubZoneInfo::new("Mt. Gulg", "The Perished Path", None),
    2999u32 => SubZoneInfo::new("Mt. Gulg", "The White Gate", None),
    3027u32 => SubZoneInfo::new("Mt. Gulg", "The False Prayer", None),
    3000u32 => SubZoneInfo::new("Mt. Gulg", "The Winding Flare", None),

    // ─── Paglth'an (Lv. 80) ───
    2939u32 => SubZoneInfo::new("Paglth'an", "Gathering Ring", Some("Amhuluk")),
    2940u32 => SubZoneInfo::new("Paglth'an", "Scalekin Pen", Some("Magitek Fortress")),
    2941u32 => SubZoneInfo::new("Paglth'an", "Sunseat", Some("Lunar Bahamut")),

    // ─── Ktisis Hyperboreia (Lv. 87) ───
    3766u32 => SubZoneInfo::new("Ktisis Hyperboreia", "Frozen Sphere", Some("Lyssa")),
    3767u32 => SubZoneInfo::new("Ktisis Hyperboreia", "Concept Review", Some("Ladon Lord")),
    3768u32 => SubZoneInfo::new("Ktisis Hyperboreia", "Celestial Sphere", Some("Hermes")),

    // ─── The Aitiascope (Lv. 89) ───
    3992u32 => SubZoneInfo::new("The Aitiascope", "Central Observatory", Some("Livia The Undeterred")),
    3993u32 => SubZoneInfo::new("The Aitiascope", "Saltcrystal Strings", Some("Rhitahtyn the Unshakable")),
    3994u32 => SubZoneInfo::new("The Aitiascope", "Midnight Downwell", Some("Amon the Undying")),

    // ─── The Dead Ends (Lv. 90) ───
    4107u32 => SubZoneInfo::new("The Dead Ends", "Pestilent Sands", None),
    4108u32 => SubZoneInfo::new("The Dead Ends", "Grebuloff Pillars", None),
    4104u32 => SubZoneInfo::new("The Dead Ends", "Shell Mound", Some("Caustic Grebuloff")),
    4109u32 => SubZoneInfo::new("The Dead Ends", "Judgment Day", None),
    4105u32 => SubZoneInfo::new("The Dead Ends", "Deterrence Grounds", Some("Peacekeepr")),
    4110u32 => SubZoneInfo::new("The Dead Ends", "The Plenty", None),
    4106u32 => SubZoneInfo::new("The Dead Ends", "The World Tree", Some("Ra La")),

    // ─── Alzadaal's Legacy (Lv. 90) ───
    4161u32 => SubZoneInfo::new("Alzadaal's Legacy", "The Bhaflau Remnants", None),
    4158u32 => SubZoneInfo::new("Alzadaal's Legacy", "Undersea Entrance", Some("Ambujam")),
    4162u32 => SubZoneInfo::new("Alzadaal's Legacy", "The Arrapago Remnants", None),
    4159u32 => SubZoneInfo::new("Alzadaal's Legacy", "The Threshold of Bounty", Some("Armored Chariot")),
    4163u32 => SubZoneInfo::new("Alzadaal's Legacy", "The Zhayolm Remnants", None),
    4166u32 => SubZoneInfo::new("Alzadaal's Legacy", "The Thrice-won Hoard", None),
    4160u32 => SubZoneInfo::new("Alzadaal's Legacy", "Weaver's Warding", Some("Kapikulu")),

    // ─── The Fell Court of Troia (Lv. 90) ───
    4184u32 => SubZoneInfo::new("The Fell Court of Troia", "Penitence", Some("Evil Dreamers")),
    4185u32 => SubZoneInfo::new("The Fell Court of Troia", "Seat of the Foremost", Some("Beatrice")),
    4186u32 => SubZoneInfo::new("The Fell Court of Troia", "Seat of the Foremost", Some("Scarmiglione")),

    // ─── Lapis Manalis (Lv. 90) ───
    4294u32 => SubZoneInfo::new("Lapis Manalis", "Magitek Snowcraft", None),
    4285u32 => SubZoneInfo::new("Lapis Manalis", "Via Nivalis XLVII", None),
    4286u32 => SubZoneInfo::new("Lapis Manalis", "Tyrannis", None),
    4274u32 => SubZoneInfo::new("Lapis Manalis", "The Silvan Throne", Some("Albion")),
    4279u32 => SubZoneInfo::new("Lapis Manalis", "Vicus Messorum", None),
    4277u32 => SubZoneInfo::new("Lapis Manalis", "Lar", None),
    4275u32 => SubZoneInfo::new("Lapis Manalis", "Forum Messorum", Some("Galatea Magna")),
    4280u32 => SubZoneInfo::new("Lapis Manalis", "Fons Manalis", None),
    4276u32 => SubZoneInfo::new("Lapis Manalis", "Deepspine", Some("Cagnazzo")),

    // ─── Aetherfont (Lv. 90) ───
    4301u32 => SubZoneInfo::new("Aetherfont", "Landfast Floe", Some("Lyngbakr")),
    4302u32 => SubZoneInfo::new("Aetherfont", "Cyancap Cavern", Some("Arkas")),
    4303u32 => SubZoneInfo::new("Aetherfont", "The Deep Below", Some("Octomammoth")),
};
