//! Node/element discretization along a reactant channel.
//!
//! A channel with `n` nodes has `n - 1` elements.
//! Node quantities live on the boundary points, element quantities (current
//! density, voltage losses) live on the intervals between them.
//!
//! ```text
//! node:     0     1     2         n-2   n-1
//!           o-----o-----o-- ... ---o-----o
//! element:     0     1               n-2
//! ```

use ndarray::{Array1, ArrayView1, Axis, s};
use serde::{Deserialize, Serialize};

/// Direction in which gas travels along the channel node indices.
///
/// `Forward` flows from node 0 to node `n - 1`; `Backward` flows from node
/// `n - 1` to node 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDirection {
    Forward,
    Backward,
}

impl FlowDirection {
    /// Index of the inlet node for a channel with `nodes` nodes.
    #[must_use]
    pub fn inlet(self, nodes: usize) -> usize {
        match self {
            Self::Forward => 0,
            Self::Backward => nodes - 1,
        }
    }

    /// Index of the outlet node for a channel with `nodes` nodes.
    #[must_use]
    pub fn outlet(self, nodes: usize) -> usize {
        match self {
            Self::Forward => nodes - 1,
            Self::Backward => 0,
        }
    }

    /// The opposite direction.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }

    /// Node indices ordered from inlet to outlet.
    pub fn nodes_downstream(self, nodes: usize) -> Box<dyn Iterator<Item = usize>> {
        match self {
            Self::Forward => Box::new(0..nodes),
            Self::Backward => Box::new((0..nodes).rev()),
        }
    }

    /// Cumulative sum of element values, accumulated from the inlet side.
    ///
    /// For `Forward` this is the prefix sum `out[k] = Σ_{j ≤ k} v[j]`, i.e.
    /// multiplication by a lower-triangular ones-matrix.
    /// For `Backward` it is the suffix sum `out[k] = Σ_{j ≥ k} v[j]`, i.e.
    /// multiplication by an upper-triangular ones-matrix.
    #[must_use]
    pub fn cumulative(self, values: ArrayView1<'_, f64>) -> Array1<f64> {
        let mut out = values.to_owned();
        match self {
            Self::Forward => out.accumulate_axis_inplace(Axis(0), |&prev, curr| *curr += prev),
            Self::Backward => {
                let n = out.len();
                for k in (0..n.saturating_sub(1)).rev() {
                    out[k] += out[k + 1];
                }
            }
        }
        out
    }
}

/// Averages adjacent node values onto the elements between them.
///
/// # Panics
///
/// Panics if `nodes` has fewer than two entries.
#[must_use]
pub fn node_to_element(nodes: ArrayView1<'_, f64>) -> Array1<f64> {
    assert!(nodes.len() >= 2, "at least two nodes are required");
    let n = nodes.len();
    (&nodes.slice(s![..n - 1]) + &nodes.slice(s![1..])) * 0.5
}

/// Spreads element values back onto the nodes.
///
/// Interior nodes take the mean of their two neighboring elements, the two
/// boundary nodes take the value of the single element they touch.
/// For a linear node profile, `element_to_node(node_to_element(x))` has the
/// same mean as `x`.
///
/// # Panics
///
/// Panics if `elements` is empty.
#[must_use]
pub fn element_to_node(elements: ArrayView1<'_, f64>) -> Array1<f64> {
    assert!(!elements.is_empty(), "at least one element is required");
    let m = elements.len();
    let mut nodes = Array1::zeros(m + 1);
    nodes[0] = elements[0];
    nodes[m] = elements[m - 1];
    if m > 1 {
        let interior = (&elements.slice(s![..m - 1]) + &elements.slice(s![1..])) * 0.5;
        nodes.slice_mut(s![1..m]).assign(&interior);
    }
    nodes
}

/// Forward differences between adjacent nodes, `out[k] = v[k + 1] - v[k]`.
#[must_use]
pub fn differences(nodes: ArrayView1<'_, f64>) -> Array1<f64> {
    let n = nodes.len();
    if n < 2 {
        return Array1::zeros(0);
    }
    &nodes.slice(s![1..]) - &nodes.slice(s![..n - 1])
}

/// `count` evenly spaced values from `start` to `end`, both included.
///
/// A single value yields `[start]`.
#[must_use]
pub fn ramp(start: f64, end: f64, count: usize) -> Array1<f64> {
    match count {
        0 => Array1::zeros(0),
        1 => Array1::from_elem(1, start),
        _ => Array1::linspace(start, end, count),
    }
}
