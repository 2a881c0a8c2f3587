//! Merging the local board with the external calendar mirror.

use std::collections::HashSet;

use crate::item::{Item, ItemId};

/// Combine Local items with the External mirror into one collection.
///
/// External items always win an id collision against a Local item, which
/// matters for optimistic local edits made while an item is in flight to
/// or from the calendar. The merge is a pure function of its two inputs:
/// it is recomputed wholesale on every change and never fails. An empty
/// external input degrades to the local collection unchanged.
pub fn merge_items(local: &[Item], external: &[Item]) -> Vec<Item> {
    let claimed: HashSet<ItemId> = external.iter().map(|i| i.id).collect();

    let mut merged: Vec<Item> = local
        .iter()
        .filter(|i| !claimed.contains(&i.id))
        .cloned()
        .collect();
    merged.extend(external.iter().cloned());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ident::external_id_to_local_id;
    use crate::item::{EventTime, Priority, Source, Status};
    use chrono::NaiveDate;
    use std::collections::HashSet;

    fn item(id: ItemId, title: &str, source: Source) -> Item {
        Item {
            id,
            title: title.to_string(),
            status: Status::Todo,
            order_index: 0,
            priority: Priority::Medium,
            category: None,
            scheduled: EventTime::Date(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()),
            start_date: None,
            end_date: None,
            source,
            external_ref: None,
        }
    }

    #[test]
    fn empty_external_degrades_to_local_only() {
        let local = vec![item(1, "a", Source::Local), item(2, "b", Source::Local)];
        let merged = merge_items(&local, &[]);
        assert_eq!(merged, local);
    }

    #[test]
    fn external_wins_id_collision() {
        // A local item whose id happens to land on the mapped id of
        // external event "evt_42".
        let mapped = external_id_to_local_id("evt_42");
        let local = vec![item(mapped, "stale local copy", Source::Local)];
        let mut mirrored = item(mapped, "Dentist", Source::External);
        mirrored.external_ref = Some("evt_42".to_string());

        let merged = merge_items(&local, &[mirrored.clone()]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].title, "Dentist");
        assert_eq!(merged[0].source, Source::External);
    }

    #[test]
    fn merged_ids_are_unique() {
        let local = vec![
            item(1, "a", Source::Local),
            item(2, "b", Source::Local),
            item(-5, "shadowed", Source::Local),
        ];
        let external = vec![item(-5, "mirror", Source::External)];

        let merged = merge_items(&local, &external);
        let ids: HashSet<ItemId> = merged.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), merged.len());
        assert_eq!(merged.len(), 3);
    }
}
