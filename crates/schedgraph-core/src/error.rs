//! Typed failures raised by the graph model and the ordering algorithms.
//!
//! Unreachable distances are *not* errors: they are reported through the
//! sentinel values in [`crate::dagsp`].

/// Errors surfaced synchronously by graph accessors and algorithms.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A vertex id outside `[0, vertex_count)` was passed to the graph.
    #[error("vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    IndexOutOfRange {
        /// The offending vertex id.
        vertex: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },

    /// Kahn's algorithm could not order every vertex: the graph has a cycle.
    #[error("graph has cycles - no topological order exists ({ordered} of {vertex_count} vertices ordered)")]
    CycleDetected {
        /// Number of vertices emitted before the queue ran dry.
        ordered: usize,
        /// Number of vertices in the graph.
        vertex_count: usize,
    },
}

impl GraphError {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::IndexOutOfRange { .. } => "E1001",
            Self::CycleDetected { .. } => "E2001",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::IndexOutOfRange { .. } => {
                Some("Check that every edge endpoint and the source lie in 0..n.")
            }
            Self::CycleDetected { .. } => {
                Some("Condense strongly connected components first, or use the DFS order.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::GraphError;

    #[test]
    fn codes_are_machine_friendly_and_unique() {
        let all = [
            GraphError::IndexOutOfRange {
                vertex: 3,
                vertex_count: 2,
            },
            GraphError::CycleDetected {
                ordered: 1,
                vertex_count: 3,
            },
        ];

        assert_ne!(all[0].code(), all[1].code());
        for err in &all {
            let code = err.code();
            assert_eq!(code.len(), 5);
            assert!(code.starts_with('E'));
            assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
            assert!(err.hint().is_some());
        }
    }

    #[test]
    fn display_mentions_bounds() {
        let err = GraphError::IndexOutOfRange {
            vertex: 7,
            vertex_count: 4,
        };
        let text = err.to_string();
        assert!(text.contains('7'));
        assert!(text.contains('4'));
    }
}
