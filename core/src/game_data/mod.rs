//! Static game data
//!
//! Pure lookup tables, consulted for labels and for deciding which
//! encounter a zone belongs to.

mod sub_zones;
mod zones;

pub use sub_zones::{SubZoneInfo, lookup_sub_zone};
pub use zones::{ZoneInfo, lookup_zone};

/// Readable name for a zone / sub-zone pair, falling back to raw IDs
pub fn area_label(zone_id: u32, sub_zone_id: Option<u32>) -> String {
    let zone = lookup_zone(zone_id)
        .map(|z| z.name.to_string())
        .unwrap_or_else(|| format!("zone {zone_id}"));

    match sub_zone_id {
        None => zone,
        Some(id) => match lookup_sub_zone(id) {
            Some(info) => format!("{zone} > {}", info.name),
            None => format!("{zone} > sub-zone {id}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_fall_back_to_ids() {
        assert_eq!(area_label(626, Some(1963)), "The Sirensong Sea > Glowering Krautz");
        assert_eq!(area_label(626, None), "The Sirensong Sea");
        assert_eq!(area_label(9, Some(8)), "zone 9 > sub-zone 8");
    }
}
