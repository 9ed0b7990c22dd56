/// The source-map side-tree.
///
/// A parallel tree mirroring the product tree, annotating each node with
/// the character ranges of the section that produced it. Corresponding
/// nodes are addressed by matching path: the n-th resource of the n-th
/// group in the product tree pairs with the same position here.
///
/// Populated unconditionally during parsing (the ranges are already at
/// hand); the caller drops the tree unless source-map export was
/// requested.

use crate::span::CharRange;

pub type RangeSet = Vec<CharRange>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadSourceMap {
    /// The payload's opening node.
    pub node: RangeSet,
    pub headers: Vec<RangeSet>,
    pub body: RangeSet,
    pub schema: RangeSet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleSourceMap {
    pub requests: Vec<PayloadSourceMap>,
    pub responses: Vec<PayloadSourceMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSourceMap {
    /// The action's header.
    pub node: RangeSet,
    pub parameters: Vec<RangeSet>,
    pub examples: Vec<ExampleSourceMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceSourceMap {
    /// The resource's header.
    pub node: RangeSet,
    pub model: Option<PayloadSourceMap>,
    pub parameters: Vec<RangeSet>,
    pub headers: Vec<RangeSet>,
    pub actions: Vec<ActionSourceMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceGroupSourceMap {
    /// The group's header; empty for implicit groups.
    pub node: RangeSet,
    pub resources: Vec<ResourceSourceMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlueprintSourceMap {
    pub metadata: Vec<RangeSet>,
    pub name: RangeSet,
    pub description: RangeSet,
    pub resource_groups: Vec<ResourceGroupSourceMap>,
    pub data_structures: Vec<RangeSet>,
}
