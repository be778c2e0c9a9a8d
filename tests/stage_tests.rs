//! Stage Integration Tests
//!
//! Tests for:
//! - Node definition: paths, roots, duplicate handling
//! - Kind predicates: imageable, boundable
//! - Instancing: proxies, prototype redirection
//! - Attributes: identity vs. value, authored detection
//! - Relationships: authored targets, ordering

use skelbind::stage::{AttrValue, NodeKind, Stage};
use skelbind::tokens::{self, TOKENS};

// ============================================================================
// Definition & Paths
// ============================================================================

#[test]
fn define_builds_absolute_paths() {
    let mut stage = Stage::new();
    let root = stage.define_root("Root", NodeKind::SkelRoot);
    let a = stage.define(root, "A", NodeKind::Transform);
    let mesh = stage.define(a, "Mesh", NodeKind::Mesh);

    assert_eq!(stage.path(root), "/Root");
    assert_eq!(stage.path(a), "/Root/A");
    assert_eq!(stage.path(mesh), "/Root/A/Mesh");

    assert_eq!(stage.node_at("/Root/A/Mesh"), Some(mesh));
    assert_eq!(stage.node_at("/Root/Missing"), None);
}

#[test]
fn duplicate_define_returns_existing() {
    let mut stage = Stage::new();
    let root = stage.define_root("Root", NodeKind::SkelRoot);
    let a = stage.define(root, "A", NodeKind::Transform);
    let again = stage.define(root, "A", NodeKind::Mesh);

    assert_eq!(a, again);
    assert_eq!(stage.kind(a), Some(NodeKind::Transform));
}

#[test]
fn hierarchy_links_both_ways() {
    let mut stage = Stage::new();
    let root = stage.define_root("Root", NodeKind::SkelRoot);
    let a = stage.define(root, "A", NodeKind::Transform);
    let b = stage.define(root, "B", NodeKind::Transform);

    assert_eq!(stage.parent(a), Some(root));
    assert_eq!(stage.children(root), &[a, b]);
    assert_eq!(stage.parent(root), None);
}

#[test]
fn is_descendant_of_is_inclusive() {
    let mut stage = Stage::new();
    let root = stage.define_root("Root", NodeKind::SkelRoot);
    let a = stage.define(root, "A", NodeKind::Transform);
    let mesh = stage.define(a, "Mesh", NodeKind::Mesh);
    let other = stage.define_root("Other", NodeKind::SkelRoot);

    assert!(stage.is_descendant_of(mesh, root));
    assert!(stage.is_descendant_of(root, root));
    assert!(!stage.is_descendant_of(other, root));
    assert!(!stage.is_descendant_of(root, mesh));
}

// ============================================================================
// Kinds
// ============================================================================

#[test]
fn kind_predicates() {
    assert!(NodeKind::Mesh.is_imageable());
    assert!(NodeKind::Mesh.is_boundable());
    assert!(!NodeKind::Skeleton.is_boundable());
    assert!(NodeKind::Transform.is_imageable());
    assert!(!NodeKind::Transform.is_boundable());
    assert!(!NodeKind::Shader.is_imageable());
}

// ============================================================================
// Activation
// ============================================================================

#[test]
fn set_active_toggles() {
    let mut stage = Stage::new();
    let root = stage.define_root("Root", NodeKind::SkelRoot);

    assert!(stage.is_active(root));
    stage.set_active(root, false);
    assert!(!stage.is_active(root));
}

// ============================================================================
// Instancing
// ============================================================================

#[test]
fn instance_proxies_redirect_to_prototype() {
    let mut stage = Stage::new();
    let root = stage.define_root("Root", NodeKind::SkelRoot);
    let proto = stage.define(root, "Proto", NodeKind::Transform);
    let inst = stage.define_instance(root, "Inst", proto);

    assert!(stage.is_instance_proxy(inst));
    assert!(!stage.is_instance_proxy(proto));
    assert_eq!(stage.prototype_of(inst), Some(proto));
    assert_eq!(stage.canonical(inst), proto);
    assert_eq!(stage.canonical(proto), proto);
}

#[test]
fn canonical_chases_chained_proxies() {
    let mut stage = Stage::new();
    let root = stage.define_root("Root", NodeKind::SkelRoot);
    let proto = stage.define(root, "Proto", NodeKind::Transform);
    let inst1 = stage.define_instance(root, "Inst1", proto);
    let inst2 = stage.define_instance(root, "Inst2", inst1);

    assert_eq!(stage.canonical(inst2), proto);
}

#[test]
fn instance_reports_prototype_kind() {
    let mut stage = Stage::new();
    let root = stage.define_root("Root", NodeKind::SkelRoot);
    let proto = stage.define(root, "Proto", NodeKind::Mesh);
    let inst = stage.define_instance(root, "Inst", proto);

    assert_eq!(stage.kind(inst), Some(NodeKind::Mesh));
}

// ============================================================================
// Attributes
// ============================================================================

#[test]
fn attr_identity_requires_authoring() {
    let mut stage = Stage::new();
    let root = stage.define_root("Root", NodeKind::SkelRoot);
    let mesh = stage.define(root, "Mesh", NodeKind::Mesh);

    assert!(stage.attr(mesh, TOKENS.joint_indices).is_none());

    stage.set_attr(mesh, TOKENS.joint_indices, AttrValue::IntArray(vec![0, 1]));
    let id = stage.attr(mesh, TOKENS.joint_indices).unwrap();

    assert_eq!(id.node, mesh);
    assert_eq!(id.name, TOKENS.joint_indices);
    assert_eq!(
        stage.attr_value(id).and_then(AttrValue::as_int_array),
        Some(&[0, 1][..])
    );
}

#[test]
fn attr_identity_is_per_node() {
    let mut stage = Stage::new();
    let root = stage.define_root("Root", NodeKind::SkelRoot);
    let m1 = stage.define(root, "M1", NodeKind::Mesh);
    let m2 = stage.define(root, "M2", NodeKind::Mesh);

    stage.set_attr(m1, TOKENS.joint_indices, AttrValue::IntArray(vec![0]));
    stage.set_attr(m2, TOKENS.joint_indices, AttrValue::IntArray(vec![0]));

    let id1 = stage.attr(m1, TOKENS.joint_indices).unwrap();
    let id2 = stage.attr(m2, TOKENS.joint_indices).unwrap();

    // Same name, same value, different node: distinct identities.
    assert_ne!(id1, id2);
}

// ============================================================================
// Relationships
// ============================================================================

#[test]
fn relationship_targets_preserve_order() {
    let mut stage = Stage::new();
    let root = stage.define_root("Root", NodeKind::SkelRoot);
    let a = stage.define(root, "A", NodeKind::Transform);

    assert!(stage.relationship_targets(a, TOKENS.skeleton).is_none());

    stage.set_relationship(a, TOKENS.skeleton, &["/Root/S1", "/Root/S2"]);
    let targets = stage.relationship_targets(a, TOKENS.skeleton).unwrap();

    assert_eq!(targets.len(), 2);
    assert_eq!(tokens::resolve(targets[0]), "/Root/S1");
    assert_eq!(tokens::resolve(targets[1]), "/Root/S2");
}

#[test]
fn authored_empty_relationship_differs_from_unauthored() {
    let mut stage = Stage::new();
    let root = stage.define_root("Root", NodeKind::SkelRoot);
    let a = stage.define(root, "A", NodeKind::Transform);

    stage.set_relationship(a, TOKENS.animation_source, &[]);

    assert_eq!(
        stage.relationship_targets(a, TOKENS.animation_source),
        Some(&[][..])
    );
    assert!(stage.relationship_targets(a, TOKENS.skeleton).is_none());
}
