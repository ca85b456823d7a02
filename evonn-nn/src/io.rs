//! Reading and writing networks in a line-oriented text format.
//!
//! Each network is one record:
//!
//! ```text
//! Network #<id>
//! Node Count: <n>
//! Node #<id>, <ROLE>           (n lines)
//! Link Count: <m>
//! Link #<id>,<source>,<target>,<weight>   (m lines)
//! ```
//!
//! Records are terminated by a blank line, and lines starting
//! with `#` are comments. Weights are written with Rust's
//! shortest round-tripping float formatting, so a network read
//! back is identical to the one written.
use crate::networks::{Network, NetworkError, NodeRole};
use crate::{LinkId, NetworkId, NodeId};

use thiserror::Error;

use std::fs;
use std::path::Path;

const COMMENT: &str = "#";
const NETWORK_LABEL: &str = "Network #";
const NODE_COUNT_LABEL: &str = "Node Count: ";
const NODE_LABEL: &str = "Node #";
const LINK_COUNT_LABEL: &str = "Link Count: ";
const LINK_LABEL: &str = "Link #";

/// Errors raised while reading persisted networks.
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected {expected}, found {found:?}")]
    Malformed {
        line: usize,
        expected: &'static str,
        found: String,
    },
    #[error("record starting on line {line} ends early, expected {expected}")]
    Truncated { line: usize, expected: &'static str },
    #[error("expected exactly one network record, found {0}")]
    RecordCount(usize),
    #[error("network #{network} is invalid: {error}")]
    Invalid {
        network: NetworkId,
        error: NetworkError,
    },
    #[error("could not access network file: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders a network as one text record, without the
/// terminating blank line.
pub fn to_text(network: &Network) -> String {
    network.to_string()
}

/// Renders several networks as a document of blank-line
/// separated records.
pub fn to_document<'a, I>(networks: I) -> String
where
    I: IntoIterator<Item = &'a Network>,
{
    networks
        .into_iter()
        .map(|network| format!("{}\n", network))
        .collect()
}

/// Parses a text containing exactly one network record.
///
/// # Examples
/// ```
/// use evonn_nn::io;
/// use evonn_nn::networks::Network;
///
/// let network = Network::minimal(4, 2, 1, &mut rand::thread_rng());
/// let parsed = io::parse_network(&io::to_text(&network)).unwrap();
///
/// assert_eq!(parsed.id(), 4);
/// assert_eq!(parsed.to_string(), network.to_string());
/// ```
pub fn parse_network(text: &str) -> Result<Network, ParseError> {
    let mut networks = parse_networks(text)?;
    if networks.len() != 1 {
        return Err(ParseError::RecordCount(networks.len()));
    }
    networks.pop().ok_or(ParseError::RecordCount(0))
}

/// Parses every record in a document, skipping comments.
pub fn parse_networks(text: &str) -> Result<Vec<Network>, ParseError> {
    let mut networks = vec![];
    let mut record: Vec<(usize, &str)> = vec![];
    for (index, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.is_empty() {
            if !record.is_empty() {
                networks.push(parse_record(&record)?);
                record.clear();
            }
        } else if !line.starts_with(COMMENT) {
            record.push((index + 1, line));
        }
    }
    if !record.is_empty() {
        networks.push(parse_record(&record)?);
    }
    Ok(networks)
}

/// Writes networks to a file, replacing its contents.
pub fn save_to_file<'a, P, I>(path: P, networks: I) -> Result<(), ParseError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a Network>,
{
    fs::write(path, to_document(networks))?;
    Ok(())
}

/// Reads every network stored in a file.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Network>, ParseError> {
    parse_networks(&fs::read_to_string(path)?)
}

/// Cursor over the non-comment lines of one record.
struct RecordLines<'a, 'b> {
    lines: &'b [(usize, &'a str)],
    next: usize,
}

impl<'a, 'b> RecordLines<'a, 'b> {
    fn first_line(&self) -> usize {
        self.lines.first().map_or(0, |(n, _)| *n)
    }

    /// Checks that a declared record count fits in the lines
    /// left, so that it can't be trusted past the input's size.
    fn expect_at_least(
        &self,
        count: usize,
        line: usize,
        expected: &'static str,
    ) -> Result<(), ParseError> {
        if count > self.lines.len() - self.next {
            return Err(ParseError::Truncated { line, expected });
        }
        Ok(())
    }

    /// Takes the next line, which must start with `label`,
    /// returning its number and the text after the label.
    fn labelled(
        &mut self,
        label: &str,
        expected: &'static str,
    ) -> Result<(usize, &'a str), ParseError> {
        let (number, line) = *self.lines.get(self.next).ok_or(ParseError::Truncated {
            line: self.first_line(),
            expected,
        })?;
        self.next += 1;
        line.strip_prefix(label)
            .map(|rest| (number, rest))
            .ok_or_else(|| malformed(number, expected, line))
    }
}

fn malformed(line: usize, expected: &'static str, found: &str) -> ParseError {
    ParseError::Malformed {
        line,
        expected,
        found: found.to_string(),
    }
}

fn number<T: std::str::FromStr>(
    line: usize,
    text: &str,
    expected: &'static str,
) -> Result<T, ParseError> {
    text.trim().parse().map_err(|_| malformed(line, expected, text))
}

fn parse_record(lines: &[(usize, &str)]) -> Result<Network, ParseError> {
    let mut cursor = RecordLines { lines, next: 0 };

    let (line, text) = cursor.labelled(NETWORK_LABEL, "network header")?;
    let id: NetworkId = number(line, text, "network id")?;

    let (line, text) = cursor.labelled(NODE_COUNT_LABEL, "node count")?;
    let node_count: usize = number(line, text, "node count")?;
    cursor.expect_at_least(node_count, line, "node record")?;
    let mut nodes: Vec<(NodeId, NodeRole)> = Vec::with_capacity(node_count);
    for _ in 0..node_count {
        let (line, text) = cursor.labelled(NODE_LABEL, "node record")?;
        let (node, role) = text
            .split_once(',')
            .ok_or_else(|| malformed(line, "`<id>, <ROLE>`", text))?;
        let role = role
            .parse()
            .map_err(|_| malformed(line, "node role", role))?;
        nodes.push((number(line, node, "node id")?, role));
    }

    let (line, text) = cursor.labelled(LINK_COUNT_LABEL, "link count")?;
    let link_count: usize = number(line, text, "link count")?;
    cursor.expect_at_least(link_count, line, "link record")?;
    let mut links: Vec<(LinkId, NodeId, NodeId, f64)> = Vec::with_capacity(link_count);
    for _ in 0..link_count {
        let (line, text) = cursor.labelled(LINK_LABEL, "link record")?;
        let fields: Vec<&str> = text.split(',').collect();
        if fields.len() != 4 {
            return Err(malformed(line, "`<id>,<source>,<target>,<weight>`", text));
        }
        let weight: f64 = number(line, fields[3], "link weight")?;
        if !weight.is_finite() {
            return Err(malformed(line, "finite link weight", fields[3]));
        }
        links.push((
            number(line, fields[0], "link id")?,
            number(line, fields[1], "source node id")?,
            number(line, fields[2], "target node id")?,
            weight,
        ));
    }

    if let Some((line, text)) = lines.get(cursor.next) {
        return Err(malformed(*line, "end of record", text));
    }

    Network::from_records(id, nodes, links)
        .map_err(|error| ParseError::Invalid { network: id, error })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    const SAMPLE: &str = "\
# Saved by hand.
Network #3
Node Count: 4
Node #0, BIAS
Node #1, INPUT
Node #2, OUTPUT
Node #5, HIDDEN
Link Count: 3
# the hidden path
Link #0,0,2,0.25
Link #7,1,5,-1.5
Link #8,5,2,3

";

    #[test]
    fn parses_sample_record() {
        let mut network = parse_network(SAMPLE).unwrap();
        assert_eq!(network.id(), 3);
        assert_eq!(network.hidden(), &[5]);
        assert_eq!(network.link(7).unwrap().endpoints(), (1, 5));
        assert_eq!(network.link(8).unwrap().weight(), 3.0);
        assert!(network.verify_connectivity().is_ok());
        assert_eq!(network.add_link(0, 5, 1.0).unwrap(), 9);
    }

    #[test]
    fn rendering_is_sorted_and_stable() {
        let network = parse_network(SAMPLE).unwrap();
        let text = to_text(&network);
        assert_eq!(
            text,
            "Network #3\nNode Count: 4\nNode #0, BIAS\nNode #1, INPUT\nNode #2, OUTPUT\n\
             Node #5, HIDDEN\nLink Count: 3\nLink #0,0,2,0.25\nLink #7,1,5,-1.5\n\
             Link #8,5,2,3\n"
        );
        assert_eq!(to_text(&parse_network(&text).unwrap()), text);
    }

    #[test]
    fn documents_hold_many_networks() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut networks: Vec<Network> = (0..4)
            .map(|id| Network::minimal(id, 3, 2, &mut rng))
            .collect();
        for network in &mut networks {
            network.mutate_new_node(&mut rng).unwrap();
        }

        let parsed = parse_networks(&to_document(&networks)).unwrap();
        assert_eq!(parsed.len(), networks.len());
        for (original, parsed) in networks.iter().zip(&parsed) {
            assert_eq!(parsed.id(), original.id());
            for link in original.links() {
                assert_eq!(parsed.link(link.id()), Some(link));
            }
            assert_eq!(parsed.hidden(), original.hidden());
        }
        assert!(matches!(
            parse_network(&to_document(&networks)),
            Err(ParseError::RecordCount(4))
        ));
    }

    #[test]
    fn reports_bad_lines() {
        let bad_role = SAMPLE.replace("HIDDEN", "NEURON");
        assert!(matches!(
            parse_network(&bad_role),
            Err(ParseError::Malformed { line: 7, .. })
        ));

        let bad_weight = SAMPLE.replace("0.25", "a quarter");
        assert!(matches!(
            parse_network(&bad_weight),
            Err(ParseError::Malformed { line: 10, .. })
        ));

        let short = SAMPLE.replace("Link Count: 3", "Link Count: 4");
        assert!(matches!(
            parse_network(&short),
            Err(ParseError::Truncated { line: 8, .. })
        ));

        let long = SAMPLE.replace("Link Count: 3", "Link Count: 2");
        assert!(matches!(
            parse_network(&long),
            Err(ParseError::Malformed { line: 12, .. })
        ));
    }

    #[test]
    fn counts_larger_than_the_record_are_truncations() {
        let huge = "Network #0\nNode Count: 18446744073709551615\nNode #0, BIAS\n";
        assert!(matches!(
            parse_network(huge),
            Err(ParseError::Truncated { line: 2, .. })
        ));

        let huge_links = SAMPLE.replace("Link Count: 3", &format!("Link Count: {}", usize::MAX));
        assert!(matches!(
            parse_network(&huge_links),
            Err(ParseError::Truncated { line: 8, .. })
        ));
    }

    #[test]
    fn rejects_non_finite_weights() {
        for weight in ["NaN", "inf", "-inf"] {
            let text = SAMPLE.replace("0.25", weight);
            assert!(matches!(
                parse_network(&text),
                Err(ParseError::Malformed { line: 10, .. })
            ));
        }
    }

    #[test]
    fn reports_invalid_structure() {
        let self_loop = SAMPLE.replace("Link #8,5,2,3", "Link #8,5,5,3");
        assert!(matches!(
            parse_network(&self_loop),
            Err(ParseError::Invalid { network: 3, .. })
        ));
    }

    #[test]
    fn files_round_trip() {
        let mut rng = StdRng::seed_from_u64(10);
        let networks = vec![
            Network::minimal(0, 1, 1, &mut rng),
            Network::minimal(1, 2, 3, &mut rng),
        ];
        let path = std::env::temp_dir().join(format!("evonn-io-{}.txt", std::process::id()));
        save_to_file(&path, &networks).unwrap();
        let loaded = load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(to_document(&loaded), to_document(&networks));
        assert!(matches!(load_from_file(&path), Err(ParseError::Io(_))));
    }
}
