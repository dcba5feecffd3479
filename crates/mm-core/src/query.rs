//! Tagged query tree
//!
//! Query bodies arrive from the server as arbitrarily nested JSON: clause
//! sequences, keyed mappings, and scalar literals. The resolver needs to
//! pattern-match that structure exhaustively, so we lift it into a small
//! tagged tree instead of branching on `serde_json::Value` variants at every
//! step. Mapping entries keep their original order; clause positions inside
//! sequences are significant and are never reordered.

use serde_json::Value;

/// One node of a query body
#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    /// Ordered clause sequence, e.g. `["field", 10, null]`
    Sequence(Vec<QueryNode>),
    /// Keyed mapping, e.g. `{"filter": [...], "breakout": [...]}`
    Mapping(Vec<(String, QueryNode)>),
    /// Scalar leaf: string, number, boolean, or null
    Literal(Value),
}

impl QueryNode {
    /// Lift a JSON value into the tagged tree
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                QueryNode::Sequence(items.into_iter().map(QueryNode::from_value).collect())
            }
            Value::Object(entries) => QueryNode::Mapping(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, QueryNode::from_value(value)))
                    .collect(),
            ),
            leaf => QueryNode::Literal(leaf),
        }
    }

    /// Lower the tree back to JSON, preserving shape and order
    pub fn into_value(self) -> Value {
        match self {
            QueryNode::Sequence(items) => {
                Value::Array(items.into_iter().map(QueryNode::into_value).collect())
            }
            QueryNode::Mapping(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(key, node)| (key, node.into_value()))
                    .collect(),
            ),
            QueryNode::Literal(leaf) => leaf,
        }
    }

    /// String payload of a literal node
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryNode::Literal(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer payload of a literal node
    ///
    /// References whose id slot holds anything else (a symbolic placeholder,
    /// a nested expression) are not concrete ids and are left untouched by
    /// the resolver.
    pub fn as_id(&self) -> Option<u64> {
        match self {
            QueryNode::Literal(Value::Number(n)) => n.as_u64(),
            _ => None,
        }
    }

    /// Overwrite a node with a concrete id literal
    pub fn set_id(&mut self, id: u64) {
        *self = QueryNode::Literal(Value::from(id));
    }

    /// Mutable lookup of a mapping entry by key
    pub fn get_mut(&mut self, key: &str) -> Option<&mut QueryNode> {
        match self {
            QueryNode::Mapping(entries) => entries
                .iter_mut()
                .find(|(k, _)| k == key)
                .map(|(_, node)| node),
            _ => None,
        }
    }
}

impl From<Value> for QueryNode {
    fn from(value: Value) -> Self {
        QueryNode::from_value(value)
    }
}

impl From<QueryNode> for Value {
    fn from(node: QueryNode) -> Self {
        node.into_value()
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
