//! Zone (duty) identification data

use phf::phf_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneInfo {
    pub name: &'static str,
    pub level: u8,
}

/// Look up a duty by zone ID
pub fn lookup_zone(zone_id: u32) -> Option<&'static ZoneInfo> {
    ZONES.get(&zone_id)
}

/// Duties with encounter definitions
pub static ZONES: phf::Map<u32, ZoneInfo> = phf_map! {
    626u32 => ZoneInfo { name: "The Sirensong Sea", level: 61 },
    660u32 => ZoneInfo { name: "Doma Castle", level: 67 },
    1040u32 => ZoneInfo { name: "Haukke Manor", level: 28 },
    1048u32 => ZoneInfo { name: "The Porta Decumana", level: 50 },
};
