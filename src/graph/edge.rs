use super::*;

/// Uncolored vertex pair, as read from an input file
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct Edge(pub Node, pub Node);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct ColoredEdge(pub Node, pub Node, pub EdgeColor);

/// Black edges stem from the input; red edges record a disagreement introduced by a merge
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum EdgeColor {
    Black,
    Red,
}

impl EdgeColor {
    pub fn is_red(self) -> bool {
        self == EdgeColor::Red
    }

    pub fn is_black(self) -> bool {
        self == EdgeColor::Black
    }
}

/// State of a vertex pair in a trigraph. At most one edge connects two nodes, so a pair is
/// either black, red, or not adjacent at all.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum EdgeKind {
    Black,
    Red,
    None,
}

impl EdgeKind {
    /// Color of the edge, or `None` if the pair is not adjacent
    pub fn color(self) -> Option<EdgeColor> {
        match self {
            EdgeKind::Black => Some(EdgeColor::Black),
            EdgeKind::Red => Some(EdgeColor::Red),
            EdgeKind::None => None,
        }
    }

    pub fn is_red(self) -> bool {
        self == EdgeKind::Red
    }

    pub fn is_black(self) -> bool {
        self == EdgeKind::Black
    }

    pub fn is_none(self) -> bool {
        self == EdgeKind::None
    }

    pub fn is_some(self) -> bool {
        self != EdgeKind::None
    }
}

impl From<(Node, Node)> for Edge {
    fn from(value: (Node, Node)) -> Self {
        Edge(value.0, value.1)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn kind_to_color() {
        assert_eq!(EdgeKind::Black.color(), Some(EdgeColor::Black));
        assert_eq!(EdgeKind::Red.color(), Some(EdgeColor::Red));
        assert_eq!(EdgeKind::None.color(), None);

        assert!(EdgeKind::Red.is_some() && EdgeKind::Red.is_red());
        assert!(EdgeKind::None.is_none() && !EdgeKind::None.is_black());
        assert!(EdgeColor::Black.is_black() && !EdgeColor::Black.is_red());
    }
}
