use crate::naming::LightType;
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Output port wired from every light transform to the default illumination
/// set when the light is created.
pub const OBJECT_SET_PORT: &str = "object_set";
pub const SET_MEMBERS_PORT: &str = "members";
pub const DEFAULT_LIGHT_SET_NAME: &str = "defaultIlluminationSet";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Transform,
    Group,
    Light(LightType),
    ObjectSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformData>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub from: NodeId,
    pub from_port: String,
    pub to: NodeId,
    pub to_port: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformData {
    pub translation: Vec3Data,
    pub rotation: QuatData,
    pub scale: Vec3Data,
}

impl TransformData {
    pub fn identity() -> Self {
        Self {
            translation: glam::Vec3::ZERO.into(),
            rotation: glam::Quat::IDENTITY.into(),
            scale: glam::Vec3::ONE.into(),
        }
    }

    pub fn components(&self) -> (glam::Vec3, glam::Quat, glam::Vec3) {
        (self.translation.clone().into(), self.rotation.clone().into(), self.scale.clone().into())
    }
}

impl Default for TransformData {
    fn default() -> Self {
        Self::identity()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3Data {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuatData {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl From<glam::Vec3> for Vec3Data {
    fn from(value: glam::Vec3) -> Self {
        Self { x: value.x, y: value.y, z: value.z }
    }
}

impl From<Vec3Data> for glam::Vec3 {
    fn from(value: Vec3Data) -> Self {
        glam::Vec3::new(value.x, value.y, value.z)
    }
}

impl From<glam::Quat> for QuatData {
    fn from(value: glam::Quat) -> Self {
        let v = value.normalize();
        Self { x: v.x, y: v.y, z: v.z, w: v.w }
    }
}

impl From<QuatData> for glam::Quat {
    fn from(value: QuatData) -> Self {
        glam::Quat::from_xyzw(value.x, value.y, value.z, value.w)
    }
}

/// In-memory scene document. Node names are unique across the document; the
/// name index is derived state and rebuilt after deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    #[serde(default)]
    connections: Vec<Connection>,
    #[serde(default)]
    selection: Vec<NodeId>,
    default_light_set: NodeId,
    #[serde(default)]
    auto_name_counters: HashMap<String, u32>,
    #[serde(skip)]
    name_index: HashMap<String, NodeId>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            connections: Vec::new(),
            selection: Vec::new(),
            default_light_set: NodeId(0),
            auto_name_counters: HashMap::new(),
            name_index: HashMap::new(),
        };
        graph.default_light_set =
            graph.insert_node(DEFAULT_LIGHT_SET_NAME.to_string(), NodeKind::ObjectSet, None);
        graph
    }

    fn insert_node(&mut self, name: String, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let transform = match kind {
            NodeKind::Transform | NodeKind::Group => Some(TransformData::identity()),
            NodeKind::Light(_) | NodeKind::ObjectSet => None,
        };
        self.nodes.push(Node { name: String::new(), kind, parent, children: Vec::new(), transform });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.index()].children.push(id);
        }
        self.set_name_unchecked(id, name);
        id
    }

    fn set_name_unchecked(&mut self, id: NodeId, name: String) {
        let old = std::mem::replace(&mut self.nodes[id.index()].name, name.clone());
        if !old.is_empty() {
            self.name_index.remove(&old);
        }
        self.name_index.insert(name, id);
    }

    /// Allocates `{stem}{n}` skipping names already present, mirroring how
    /// hosts hand out initial node names before the artist renames them.
    fn allocate_name(&mut self, stem: &str) -> String {
        let counter = self.auto_name_counters.entry(stem.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{stem}{counter}");
            if !self.name_index.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Creates a light shape beneath a fresh transform and wires the
    /// transform's object-set output to the default illumination set.
    /// Returns the shape node; callers resolve the transform via the parent.
    pub fn create_light(&mut self, light_type: LightType) -> NodeId {
        let transform_name = self.allocate_name(light_type.type_name());
        let transform = self.insert_node(transform_name, NodeKind::Transform, None);
        let shape_name = self.allocate_name(&format!("{}Shape", light_type.type_name()));
        let shape = self.insert_node(shape_name, NodeKind::Light(light_type), Some(transform));
        self.connections.push(Connection {
            from: transform,
            from_port: OBJECT_SET_PORT.to_string(),
            to: self.default_light_set,
            to_port: SET_MEMBERS_PORT.to_string(),
        });
        shape
    }

    pub fn create_group(&mut self, name: &str) -> Result<NodeId> {
        if self.name_index.contains_key(name) {
            bail!("a node named '{name}' already exists");
        }
        Ok(self.insert_node(name.to_string(), NodeKind::Group, None))
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.index()].kind
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.index()].name
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn exists(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.name_index.get(name).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(index, node)| (NodeId(index as u32), node))
    }

    pub fn rename(&mut self, id: NodeId, new_name: &str) -> Result<()> {
        if new_name.is_empty() {
            bail!("node names must not be empty");
        }
        match self.name_index.get(new_name) {
            Some(&occupant) if occupant != id => {
                bail!("cannot rename '{}' to '{new_name}': name is taken", self.name(id));
            }
            _ => {}
        }
        self.set_name_unchecked(id, new_name.to_string());
        Ok(())
    }

    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId) -> Result<()> {
        if child == new_parent {
            bail!("cannot parent '{}' to itself", self.name(child));
        }
        let mut ancestor = Some(new_parent);
        while let Some(current) = ancestor {
            if current == child {
                bail!("cannot parent '{}' beneath its own descendant", self.name(child));
            }
            ancestor = self.parent(current);
        }
        if let Some(old_parent) = self.nodes[child.index()].parent {
            self.nodes[old_parent.index()].children.retain(|&c| c != child);
        }
        self.nodes[child.index()].parent = Some(new_parent);
        self.nodes[new_parent.index()].children.push(child);
        Ok(())
    }

    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    pub fn select(&mut self, ids: Vec<NodeId>) {
        self.selection = ids;
    }

    pub fn selected_names(&self) -> Vec<String> {
        self.selection.iter().map(|&id| self.name(id).to_string()).collect()
    }

    /// First downstream connection leaving `from` on `port`, if any.
    pub fn downstream_connection(&self, from: NodeId, port: &str) -> Option<&Connection> {
        self.connections.iter().find(|c| c.from == from && c.from_port == port)
    }

    /// Severs the first downstream connection on `port`. Returns whether a
    /// connection was removed.
    pub fn break_connection(&mut self, from: NodeId, port: &str) -> bool {
        let Some(position) =
            self.connections.iter().position(|c| c.from == from && c.from_port == port)
        else {
            return false;
        };
        self.connections.remove(position);
        true
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn roots(&self) -> Vec<NodeId> {
        self.nodes()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(id, _)| id)
            .collect()
    }

    fn rebuild_index(&mut self) -> Result<()> {
        self.name_index.clear();
        for index in 0..self.nodes.len() {
            let id = NodeId(index as u32);
            let name = self.nodes[index].name.clone();
            if name.is_empty() {
                bail!("scene document contains an unnamed node at slot {index}");
            }
            if self.name_index.insert(name.clone(), id).is_some() {
                bail!("scene document contains duplicate node name '{name}'");
            }
        }
        for connection in &self.connections {
            for endpoint in [connection.from, connection.to] {
                if endpoint.index() >= self.nodes.len() {
                    bail!("scene document connection references unknown node slot {}", endpoint.index());
                }
            }
        }
        self.selection.retain(|id| id.index() < self.nodes.len());
        let set = self.default_light_set;
        if set.index() >= self.nodes.len() || self.nodes[set.index()].kind != NodeKind::ObjectSet {
            return Err(anyhow!("scene document is missing its default illumination set"));
        }
        Ok(())
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("Reading scene file {}", path.display()))?;
        let mut graph = serde_json::from_slice::<SceneGraph>(&bytes)
            .with_context(|| format!("Parsing scene file {}", path.display()))?;
        graph.rebuild_index().with_context(|| format!("Validating scene file {}", path.display()))?;
        Ok(graph)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Creating scene directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json.as_bytes())
            .with_context(|| format!("Writing scene file {}", path.display()))?;
        Ok(())
    }
}
