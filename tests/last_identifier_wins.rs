// tests/last_identifier_wins.rs
use proptest::prelude::*;
use sheet_viewer::{CellValue, Effect, FetchCoordinator, FetchTicket, SpreadsheetId, TabularPayload};

fn payload_for(ticket: &FetchTicket) -> TabularPayload {
    TabularPayload::from_rows(vec![vec![
        CellValue::from(ticket.id.as_str()),
        CellValue::from(ticket.generation.to_string()),
    ]])
}

proptest! {
    // Every fetch is issued before any resolves, then they resolve in an arbitrary order.
    #[test]
    fn final_snapshot_belongs_to_last_identifier(
        ids in prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "d"]), 1..16),
        order_keys in prop::collection::vec(any::<u32>(), 16),
    ) {
        let mut coordinator = FetchCoordinator::new();
        let mut tickets = Vec::new();
        let mut expected_fetches = 0;
        let mut previous: Option<&str> = None;

        for id in &ids {
            if previous != Some(*id) {
                expected_fetches += 1;
            }
            previous = Some(*id);
            if let Some(ticket) = coordinator.on_identifier_change(SpreadsheetId::from(*id)) {
                tickets.push(ticket);
            }
        }
        prop_assert_eq!(tickets.len(), expected_fetches);

        let last = tickets.last().cloned().expect("at least one fetch");
        let mut shuffled: Vec<(u32, FetchTicket)> = tickets
            .into_iter()
            .enumerate()
            .map(|(i, ticket)| (order_keys[i], ticket))
            .collect();
        shuffled.sort_by_key(|(key, _)| *key);

        let mut renders = 0;
        for (_, ticket) in shuffled {
            let data = payload_for(&ticket);
            match coordinator.on_fetch_resolved(ticket, Ok(data)) {
                Effect::Render => renders += 1,
                Effect::Discarded => {}
                other => prop_assert!(false, "unexpected effect {:?}", other),
            }
        }

        prop_assert_eq!(renders, 1);
        prop_assert_eq!(coordinator.payload(), &payload_for(&last));
        prop_assert_eq!(
            coordinator.loaded_from().map(SpreadsheetId::as_str),
            ids.last().copied()
        );
    }
}
