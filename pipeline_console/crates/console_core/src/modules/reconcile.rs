use crate::modules::protocol::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    Replaced(usize),
    Appended(usize),
}

/// Replaces the entry for the same stream in place, or appends when the
/// stream is not cached yet.
pub fn merge_connection(connections: &mut Vec<Connection>, incoming: Connection) -> Merge {
    if let Some(pos) = connections
        .iter()
        .position(|c| c.stream_id == incoming.stream_id)
    {
        connections[pos] = incoming;
        return Merge::Replaced(pos);
    }
    connections.push(incoming);
    Merge::Appended(connections.len() - 1)
}

/// Applies a batch in order; a later entry for the same stream wins.
pub fn merge_connections<I>(connections: &mut Vec<Connection>, incoming: I) -> Vec<Merge>
where
    I: IntoIterator<Item = Connection>,
{
    incoming
        .into_iter()
        .map(|c| merge_connection(connections, c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(stream: &str, pipelines: &[&str]) -> Connection {
        Connection {
            id: None,
            stream_id: stream.to_string(),
            pipeline_ids: pipelines.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn replaces_existing_stream_in_place() {
        let mut cache = vec![conn("A", &["p1"]), conn("B", &["p3"])];
        let merge = merge_connection(&mut cache, conn("A", &["p1", "p2"]));

        assert_eq!(merge, Merge::Replaced(0));
        assert_eq!(cache, vec![conn("A", &["p1", "p2"]), conn("B", &["p3"])]);
    }

    #[test]
    fn appends_unknown_stream() {
        let mut cache = vec![conn("A", &["p1"])];
        let merge = merge_connection(&mut cache, conn("C", &["p9"]));

        assert_eq!(merge, Merge::Appended(1));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache[1], conn("C", &["p9"]));
    }

    #[test]
    fn batch_is_last_write_wins() {
        let mut cache = Vec::new();
        let merges = merge_connections(
            &mut cache,
            vec![conn("A", &["p1"]), conn("B", &["p1"]), conn("A", &["p1", "p2"])],
        );

        assert_eq!(
            merges,
            vec![Merge::Appended(0), Merge::Appended(1), Merge::Replaced(0)]
        );
        assert_eq!(cache, vec![conn("A", &["p1", "p2"]), conn("B", &["p1"])]);
    }

    #[test]
    fn never_duplicates_a_stream() {
        let mut cache = vec![conn("A", &[])];
        for i in 0..5 {
            let pipeline = format!("p{i}");
            merge_connection(&mut cache, conn("A", &[pipeline.as_str()]));
        }
        assert_eq!(cache.len(), 1);
        assert_eq!(cache[0], conn("A", &["p4"]));
    }
}
