use glam::Mat4;
use rustc_hash::FxHashMap;

use crate::stage::{NodeHandle, Stage};
use crate::tokens::{self, Symbol, TOKENS};

/// A skeleton node's parsed joint order, topology and pose data.
///
/// Constructed at most once per skeleton node per cache generation and
/// shared read-only by every skeleton query that references the node.
///
/// Joint tokens are `/`-separated pseudo-paths (`Hips/Spine/Chest`); a
/// joint's parent is the longest proper prefix present in the array. The
/// array must list parents before children.
#[derive(Debug)]
pub struct SkeletonDefinition {
    skeleton: NodeHandle,
    joint_order: Vec<Symbol>,
    parent_indices: Vec<Option<usize>>,
    rest_transforms: Option<Vec<Mat4>>,
    bind_transforms: Option<Vec<Mat4>>,
}

impl SkeletonDefinition {
    /// Parses the definition off a skeleton node.
    ///
    /// Returns `None` when the joint array is missing, empty, contains
    /// duplicates, or lists a child before its parent. Pose arrays whose
    /// length does not match the joint count are dropped with a warning;
    /// they never fail the parse.
    pub(crate) fn parse(stage: &Stage, skeleton: NodeHandle) -> Option<Self> {
        let Some(joint_order) = stage
            .attr(skeleton, TOKENS.joints)
            .and_then(|id| stage.attr_value(id))
            .and_then(|v| v.as_token_array())
            .map(<[Symbol]>::to_vec)
        else {
            log::warn!("<{}> has no joint token array", stage.path(skeleton));
            return None;
        };
        if joint_order.is_empty() {
            log::warn!("<{}> has an empty joint array", stage.path(skeleton));
            return None;
        }

        let parent_indices = compute_parent_indices(stage, skeleton, &joint_order)?;

        let rest_transforms = read_pose(stage, skeleton, TOKENS.rest_transforms, joint_order.len());
        let bind_transforms = read_pose(stage, skeleton, TOKENS.bind_transforms, joint_order.len());

        Some(Self {
            skeleton,
            joint_order,
            parent_indices,
            rest_transforms,
            bind_transforms,
        })
    }

    /// The skeleton node this definition was parsed from.
    #[inline]
    #[must_use]
    pub fn skeleton(&self) -> NodeHandle {
        self.skeleton
    }

    /// The skeleton's native joint order.
    #[inline]
    #[must_use]
    pub fn joint_order(&self) -> &[Symbol] {
        &self.joint_order
    }

    /// Number of joints.
    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joint_order.len()
    }

    /// Per-joint parent index; `None` marks a root joint.
    #[inline]
    #[must_use]
    pub fn parent_indices(&self) -> &[Option<usize>] {
        &self.parent_indices
    }

    /// Rest-pose transforms, if authored and well-formed.
    #[inline]
    #[must_use]
    pub fn rest_transforms(&self) -> Option<&[Mat4]> {
        self.rest_transforms.as_deref()
    }

    /// Bind-pose transforms, if authored and well-formed.
    #[inline]
    #[must_use]
    pub fn bind_transforms(&self) -> Option<&[Mat4]> {
        self.bind_transforms.as_deref()
    }
}

/// Derives each joint's parent from the pseudo-path joint tokens.
fn compute_parent_indices(
    stage: &Stage,
    skeleton: NodeHandle,
    joint_order: &[Symbol],
) -> Option<Vec<Option<usize>>> {
    let mut index_of: FxHashMap<Symbol, usize> = FxHashMap::default();
    for (i, &joint) in joint_order.iter().enumerate() {
        if index_of.insert(joint, i).is_some() {
            log::warn!(
                "<{}> lists joint '{}' more than once",
                stage.path(skeleton),
                tokens::resolve(joint)
            );
            return None;
        }
    }

    let mut parents = Vec::with_capacity(joint_order.len());
    for (i, &joint) in joint_order.iter().enumerate() {
        let parent = longest_prefix_in(tokens::resolve(joint), &index_of);
        if let Some(p) = parent {
            if p >= i {
                log::warn!(
                    "<{}> lists joint '{}' before its parent",
                    stage.path(skeleton),
                    tokens::resolve(joint)
                );
                return None;
            }
        }
        parents.push(parent);
    }
    Some(parents)
}

/// The index of the longest proper path prefix of `token` present in the
/// joint array, if any.
fn longest_prefix_in(token: &str, index_of: &FxHashMap<Symbol, usize>) -> Option<usize> {
    let mut prefix = token;
    while let Some(split) = prefix.rfind('/') {
        prefix = &prefix[..split];
        if let Some(sym) = tokens::get(prefix) {
            if let Some(&idx) = index_of.get(&sym) {
                return Some(idx);
            }
        }
    }
    None
}

/// Reads a pose transform array, dropping it when its length does not
/// match the joint count.
fn read_pose(
    stage: &Stage,
    skeleton: NodeHandle,
    name: Symbol,
    joint_count: usize,
) -> Option<Vec<Mat4>> {
    let id = stage.attr(skeleton, name)?;
    let pose = stage
        .attr_value(id)?
        .as_matrix_array()
        .map(<[Mat4]>::to_vec)?;
    if pose.len() == joint_count {
        Some(pose)
    } else {
        log::warn!(
            "<{}>.{} has {} transforms for {} joints; ignoring",
            stage.path(skeleton),
            tokens::resolve(name),
            pose.len(),
            joint_count
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::{AttrValue, NodeKind};

    fn skeleton_with_joints(joints: &[&str]) -> (Stage, NodeHandle) {
        let mut stage = Stage::new();
        let root = stage.define_root("Root", NodeKind::SkelRoot);
        let skel = stage.define(root, "Skel", NodeKind::Skeleton);
        let tokens: Vec<Symbol> = joints.iter().map(|j| tokens::intern(j)).collect();
        stage.set_attr(skel, TOKENS.joints, AttrValue::TokenArray(tokens));
        (stage, skel)
    }

    #[test]
    fn topology_parents_from_path_prefixes() {
        let (stage, skel) =
            skeleton_with_joints(&["Hips", "Hips/Spine", "Hips/Spine/Chest", "Hips/LeftLeg"]);
        let def = SkeletonDefinition::parse(&stage, skel).unwrap();

        assert_eq!(def.joint_count(), 4);
        assert_eq!(def.parent_indices(), &[None, Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn skipped_path_levels_still_find_an_ancestor() {
        // "Hips/Spine" is absent; "Hips/Spine/Chest" falls back to "Hips".
        let (stage, skel) = skeleton_with_joints(&["Hips", "Hips/Spine/Chest"]);
        let def = SkeletonDefinition::parse(&stage, skel).unwrap();
        assert_eq!(def.parent_indices(), &[None, Some(0)]);
    }

    #[test]
    fn child_before_parent_fails() {
        let (stage, skel) = skeleton_with_joints(&["Hips/Spine", "Hips"]);
        assert!(SkeletonDefinition::parse(&stage, skel).is_none());
    }

    #[test]
    fn duplicate_joint_fails() {
        let (stage, skel) = skeleton_with_joints(&["Hips", "Hips"]);
        assert!(SkeletonDefinition::parse(&stage, skel).is_none());
    }

    #[test]
    fn missing_joints_fails() {
        let mut stage = Stage::new();
        let root = stage.define_root("Root", NodeKind::SkelRoot);
        let skel = stage.define(root, "Skel", NodeKind::Skeleton);
        assert!(SkeletonDefinition::parse(&stage, skel).is_none());
    }

    #[test]
    fn mismatched_pose_length_is_dropped_not_fatal() {
        let (mut stage, skel) = skeleton_with_joints(&["Hips", "Hips/Spine"]);
        stage.set_attr(
            skel,
            TOKENS.rest_transforms,
            AttrValue::MatrixArray(vec![Mat4::IDENTITY]),
        );
        stage.set_attr(
            skel,
            TOKENS.bind_transforms,
            AttrValue::MatrixArray(vec![Mat4::IDENTITY; 2]),
        );

        let def = SkeletonDefinition::parse(&stage, skel).unwrap();
        assert!(def.rest_transforms().is_none());
        assert_eq!(def.bind_transforms().unwrap().len(), 2);
    }
}
