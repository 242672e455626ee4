pub mod domain {
    /// One row of the capture file.
    #[derive(Debug, Clone, PartialEq)]
    pub struct PacketRecord {
        pub protocol: String,
        pub source_address: String,
        pub destination_address: String,
        pub size: f64,
    }

    impl PacketRecord {
        pub fn new(protocol: &str, source: &str, destination: &str, size: f64) -> Self {
            PacketRecord {
                protocol: protocol.to_string(),
                source_address: source.to_string(),
                destination_address: destination.to_string(),
                size,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ProtocolCount {
        pub protocol: String,
        pub count: u64,
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AddressCount {
        pub address: String,
        pub count: u64,
    }

    /// Aggregate computed once per request. `average_size` is `None` when
    /// there were no rows to average.
    #[derive(Debug, Clone, PartialEq)]
    pub struct StatisticsReport {
        pub protocol_counts: Vec<ProtocolCount>,
        pub top_addresses: Vec<AddressCount>,
        pub total_packets: usize,
        pub average_size: Option<f64>,
    }

    impl StatisticsReport {
        pub fn is_empty(&self) -> bool {
            self.total_packets == 0
        }
    }
}

pub mod dto {
    use serde::ser::{Serialize, SerializeMap, Serializer};

    use super::domain::StatisticsReport;

    /// Name → count pairs serialized as a JSON object in insertion order.
    #[derive(Debug, Clone)]
    pub struct OrderedCounts(pub Vec<(String, u64)>);

    impl Serialize for OrderedCounts {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            let mut map = serializer.serialize_map(Some(self.0.len()))?;
            for (name, count) in &self.0 {
                map.serialize_entry(name, count)?;
            }
            map.end()
        }
    }

    #[derive(Debug, serde::Serialize, Clone)]
    pub struct StatsResponse {
        pub protocol_counts: OrderedCounts,
        pub top_ips: OrderedCounts,
        pub total_packets: usize,
        pub avg_packet_size: Option<f64>,
    }

    impl From<&StatisticsReport> for StatsResponse {
        fn from(report: &StatisticsReport) -> Self {
            StatsResponse {
                protocol_counts: OrderedCounts(
                    report
                        .protocol_counts
                        .iter()
                        .map(|p| (p.protocol.clone(), p.count))
                        .collect(),
                ),
                top_ips: OrderedCounts(
                    report
                        .top_addresses
                        .iter()
                        .map(|a| (a.address.clone(), a.count))
                        .collect(),
                ),
                total_packets: report.total_packets,
                avg_packet_size: report.average_size,
            }
        }
    }

    #[derive(Debug, serde::Serialize, Clone)]
    pub struct ErrorResponse {
        pub error: String,
    }
}
