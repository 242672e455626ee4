use std::collections::HashMap;

use crate::models::domain::{AddressCount, PacketRecord, ProtocolCount, StatisticsReport};

pub const TOP_ADDRESS_LIMIT: usize = 3;

// Position of an address in the source column followed by the destination
// column. Sources always sort before destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Column {
    Source,
    Destination,
}

#[derive(Debug, Clone, Copy)]
struct Tally<K> {
    count: u64,
    first_seen: K,
}

/// Running totals over a packet table. Feed rows with `update`, then call
/// `finish` to rank everything.
#[derive(Debug, Default)]
pub struct NetworkStats {
    total_packets: usize,
    total_bytes: f64,
    protocol_counts: HashMap<String, Tally<usize>>,
    address_counts: HashMap<String, Tally<(Column, usize)>>,
}

impl NetworkStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, record: &PacketRecord) {
        let row = self.total_packets;
        self.total_packets += 1;
        self.total_bytes += record.size;

        bump(&mut self.protocol_counts, &record.protocol, row);
        bump(&mut self.address_counts, &record.source_address, (Column::Source, row));
        bump(
            &mut self.address_counts,
            &record.destination_address,
            (Column::Destination, row),
        );
    }

    pub fn finish(self) -> StatisticsReport {
        let average_size = (self.total_packets > 0)
            .then(|| self.total_bytes / self.total_packets as f64);

        let protocol_counts = ranked(self.protocol_counts)
            .into_iter()
            .map(|(protocol, count)| ProtocolCount { protocol, count })
            .collect();

        let top_addresses = ranked(self.address_counts)
            .into_iter()
            .take(TOP_ADDRESS_LIMIT)
            .map(|(address, count)| AddressCount { address, count })
            .collect();

        StatisticsReport {
            protocol_counts,
            top_addresses,
            total_packets: self.total_packets,
            average_size,
        }
    }
}

impl StatisticsReport {
    pub fn from_records(records: &[PacketRecord]) -> Self {
        let mut stats = NetworkStats::new();
        for record in records {
            stats.update(record);
        }
        stats.finish()
    }
}

fn bump<K: Ord + Copy>(counts: &mut HashMap<String, Tally<K>>, key: &str, position: K) {
    match counts.get_mut(key) {
        Some(tally) => {
            tally.count += 1;
            tally.first_seen = tally.first_seen.min(position);
        }
        None => {
            counts.insert(key.to_string(), Tally { count: 1, first_seen: position });
        }
    }
}

// Descending by count, earliest first appearance wins ties.
fn ranked<K: Ord + Copy>(counts: HashMap<String, Tally<K>>) -> Vec<(String, u64)> {
    let mut entries: Vec<_> = counts.into_iter().collect();
    entries.sort_by(|(_, a), (_, b)| {
        b.count.cmp(&a.count).then_with(|| a.first_seen.cmp(&b.first_seen))
    });
    entries.into_iter().map(|(key, tally)| (key, tally.count)).collect()
}
