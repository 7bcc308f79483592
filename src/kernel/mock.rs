//! MockKernel: deterministic in-memory stand-in for a modeling kernel
//!
//! Keeps every object it creates in a single store and answers queries from
//! vertex positions alone. Construction rules:
//!
//! - a wire is closed when its chain returns to the first vertex
//! - a cell needs a closed shell, i.e. every boundary segment shared by
//!   exactly two faces
//! - a cell complex needs every segment shared at least twice and at least
//!   one internal segment shared more than twice
//! - union of touching solids is a cell complex, anything else a cluster
//! - distance is measured to vertices and edge segments only
//! - the internal vertex of a face is its centroid (exact for convex faces)
//! - shortest paths count edges; vertex and edge weight keys are ignored
//!
//! Used by the node tests and by the driver binary.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::{Duration, Instant};

use glam::DVec3;
use log::debug;

use super::{Kernel, KernelError, KernelResult};
use crate::topology::{Edge, Face, Handle, TopologyType, Vertex, Wire};

/// Positions closer than this are the same point
const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Upper bound on enumerated equal-length paths
const MAX_PATHS: usize = 64;

type PointKey = [i64; 3];
type SegmentKey = (PointKey, PointKey);

#[derive(Debug, Clone)]
enum Entity {
    Vertex(DVec3),
    Edge { start: Handle, end: Handle },
    /// `vertices` is the ordered chain; a closed wire does not repeat its first vertex
    Wire { edges: Vec<Handle>, vertices: Vec<Handle>, closed: bool },
    Face { boundary: Handle, vertices: Vec<Handle> },
    Shell { faces: Vec<Handle> },
    Cell { faces: Vec<Handle> },
    /// Cells, or faces when built directly from faces
    CellComplex { parts: Vec<Handle> },
    Cluster { members: Vec<Handle> },
    Graph { vertices: Vec<Handle>, edges: Vec<(usize, usize)> },
    Dictionary { entries: Vec<(String, String)> },
}

impl Entity {
    fn type_tag(&self) -> u32 {
        match self {
            Entity::Vertex(_) => 1,
            Entity::Edge { .. } => 2,
            Entity::Wire { .. } => 4,
            Entity::Face { .. } => 8,
            Entity::Shell { .. } => 16,
            Entity::Cell { .. } => 32,
            Entity::CellComplex { .. } => 64,
            Entity::Cluster { .. } => 128,
            Entity::Graph { .. } | Entity::Dictionary { .. } => 0,
        }
    }

    fn topology_type(&self) -> TopologyType {
        TopologyType::from_tag(self.type_tag())
    }

    fn is_solid(&self) -> bool {
        matches!(self, Entity::Cell { .. } | Entity::CellComplex { .. })
    }
}

fn point_key(point: DVec3, tolerance: f64) -> PointKey {
    let scaled = (point / tolerance).round();
    [scaled.x as i64, scaled.y as i64, scaled.z as i64]
}

fn segment_key(a: PointKey, b: PointKey) -> SegmentKey {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn point_segment_distance(point: DVec3, a: DVec3, b: DVec3) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

#[derive(Debug, Default)]
struct Store {
    entities: HashMap<Handle, Entity>,
    /// Insertion order, so queries that scan the store are deterministic
    order: Vec<Handle>,
    dictionaries: HashMap<Handle, Handle>,
}

impl Store {
    fn insert(&mut self, entity: Entity) -> Handle {
        let handle = Handle::new();
        self.entities.insert(handle, entity);
        self.order.push(handle);
        handle
    }

    fn get(&self, handle: Handle) -> KernelResult<&Entity> {
        self.entities
            .get(&handle)
            .ok_or(KernelError::UnknownHandle(handle))
    }

    fn position(&self, vertex: Handle) -> KernelResult<DVec3> {
        match self.get(vertex)? {
            Entity::Vertex(position) => Ok(*position),
            other => Err(KernelError::WrongType {
                expected: TopologyType::Vertex,
                found: other.topology_type(),
            }),
        }
    }

    fn same_point(&self, a: Handle, b: Handle) -> KernelResult<bool> {
        Ok(a == b || self.position(a)?.distance(self.position(b)?) < DEFAULT_TOLERANCE)
    }

    fn edge_ends(&self, edge: Handle) -> KernelResult<(Handle, Handle)> {
        match self.get(edge)? {
            Entity::Edge { start, end } => Ok((*start, *end)),
            other => Err(KernelError::WrongType {
                expected: TopologyType::Edge,
                found: other.topology_type(),
            }),
        }
    }

    fn face_loop(&self, face: Handle) -> KernelResult<&[Handle]> {
        match self.get(face)? {
            Entity::Face { vertices, .. } => Ok(vertices),
            other => Err(KernelError::WrongType {
                expected: TopologyType::Face,
                found: other.topology_type(),
            }),
        }
    }

    fn wire_loop(&self, wire: Handle) -> KernelResult<(&[Handle], bool)> {
        match self.get(wire)? {
            Entity::Wire { vertices, closed, .. } => Ok((vertices, *closed)),
            other => Err(KernelError::WrongType {
                expected: TopologyType::Wire,
                found: other.topology_type(),
            }),
        }
    }

    /// Collect every vertex and edge segment reachable from `handle`
    fn explode(
        &self,
        handle: Handle,
        vertices: &mut Vec<Handle>,
        segments: &mut Vec<(Handle, Handle)>,
    ) -> KernelResult<()> {
        match self.get(handle)? {
            Entity::Vertex(_) => vertices.push(handle),
            Entity::Edge { start, end } => {
                vertices.extend([*start, *end]);
                segments.push((*start, *end));
            }
            Entity::Wire { edges, .. } => {
                for edge in edges {
                    self.explode(*edge, vertices, segments)?;
                }
            }
            Entity::Face { boundary, .. } => self.explode(*boundary, vertices, segments)?,
            Entity::Shell { faces } | Entity::Cell { faces } => {
                for face in faces {
                    self.explode(*face, vertices, segments)?;
                }
            }
            Entity::CellComplex { parts } => {
                for part in parts {
                    self.explode(*part, vertices, segments)?;
                }
            }
            Entity::Cluster { members } => {
                for member in members {
                    self.explode(*member, vertices, segments)?;
                }
            }
            Entity::Graph { vertices: nodes, edges } => {
                vertices.extend(nodes.iter().copied());
                segments.extend(edges.iter().map(|&(a, b)| (nodes[a], nodes[b])));
            }
            Entity::Dictionary { .. } => {
                return Err(KernelError::NotA {
                    handle,
                    expected: "topology",
                })
            }
        }
        Ok(())
    }

    fn face_segments(&self, face: Handle, tolerance: f64) -> KernelResult<Vec<SegmentKey>> {
        let ring = self.face_loop(face)?;
        let keys = ring
            .iter()
            .map(|vertex| Ok(point_key(self.position(*vertex)?, tolerance)))
            .collect::<KernelResult<Vec<_>>>()?;
        Ok((0..keys.len())
            .map(|i| segment_key(keys[i], keys[(i + 1) % keys.len()]))
            .collect())
    }

    /// How many of `faces` use each boundary segment
    fn segment_counts(
        &self,
        faces: &[Face],
        tolerance: f64,
    ) -> KernelResult<HashMap<SegmentKey, usize>> {
        let mut counts = HashMap::new();
        for face in faces {
            for segment in self.face_segments(face.handle(), tolerance)? {
                *counts.entry(segment).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    fn point_keys(&self, handle: Handle) -> KernelResult<HashSet<PointKey>> {
        let mut vertices = Vec::new();
        self.explode(handle, &mut vertices, &mut Vec::new())?;
        vertices
            .into_iter()
            .map(|vertex| Ok(point_key(self.position(vertex)?, DEFAULT_TOLERANCE)))
            .collect()
    }

    /// Build edges, a closed wire and a face around `ring`
    fn face_from_ring(&mut self, ring: &[Handle]) -> Handle {
        let edges: Vec<Handle> = (0..ring.len())
            .map(|i| {
                self.insert(Entity::Edge {
                    start: ring[i],
                    end: ring[(i + 1) % ring.len()],
                })
            })
            .collect();
        let boundary = self.insert(Entity::Wire {
            edges,
            vertices: ring.to_vec(),
            closed: true,
        });
        self.insert(Entity::Face {
            boundary,
            vertices: ring.to_vec(),
        })
    }

    /// Open wire through `path`
    fn wire_through(&mut self, path: &[Handle]) -> Handle {
        let edges = path
            .windows(2)
            .map(|pair| {
                self.insert(Entity::Edge {
                    start: pair[0],
                    end: pair[1],
                })
            })
            .collect();
        self.insert(Entity::Wire {
            edges,
            vertices: path.to_vec(),
            closed: false,
        })
    }

    fn is_connected(&self, faces: &[Face]) -> KernelResult<bool> {
        let segments = faces
            .iter()
            .map(|face| {
                self.face_segments(face.handle(), DEFAULT_TOLERANCE)
                    .map(|list| list.into_iter().collect::<HashSet<_>>())
            })
            .collect::<KernelResult<Vec<_>>>()?;

        let mut reached = vec![false; faces.len()];
        let mut queue = VecDeque::from([0]);
        reached[0] = true;
        while let Some(current) = queue.pop_front() {
            for other in 0..faces.len() {
                if !reached[other] && !segments[current].is_disjoint(&segments[other]) {
                    reached[other] = true;
                    queue.push_back(other);
                }
            }
        }
        Ok(reached.into_iter().all(|r| r))
    }

    fn merged_dictionary(&mut self, sources: &[Handle]) -> KernelResult<Option<Handle>> {
        let mut merged: Vec<(String, String)> = Vec::new();
        let mut found = false;
        for source in sources {
            let Some(dictionary) = self.dictionaries.get(source).copied() else {
                continue;
            };
            found = true;
            if let Entity::Dictionary { entries } = self.get(dictionary)? {
                for (key, value) in entries {
                    match merged.iter_mut().find(|(existing, _)| existing == key) {
                        Some(slot) => slot.1 = value.clone(),
                        None => merged.push((key.clone(), value.clone())),
                    }
                }
            }
        }
        Ok(found.then(|| self.insert(Entity::Dictionary { entries: merged })))
    }
}

/// Deterministic test double implementing `Kernel`
#[derive(Debug, Default)]
pub struct MockKernel {
    store: RefCell<Store>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects created so far
    pub fn len(&self) -> usize {
        self.store.borrow().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Graph whose nodes are the distinct endpoints of `edges`
    pub fn graph_by_edges(&self, edges: &[Edge]) -> KernelResult<Handle> {
        let mut store = self.store.borrow_mut();
        let mut vertices: Vec<Handle> = Vec::new();
        let mut index_of: HashMap<PointKey, usize> = HashMap::new();
        let mut links = Vec::with_capacity(edges.len());

        for edge in edges {
            let (start, end) = store.edge_ends(edge.handle())?;
            let mut indices = [0; 2];
            for (slot, vertex) in indices.iter_mut().zip([start, end]) {
                let key = point_key(store.position(vertex)?, DEFAULT_TOLERANCE);
                *slot = *index_of.entry(key).or_insert_with(|| {
                    vertices.push(vertex);
                    vertices.len() - 1
                });
            }
            links.push((indices[0], indices[1]));
        }

        Ok(store.insert(Entity::Graph {
            vertices,
            edges: links,
        }))
    }

    pub fn dictionary_by_pairs(&self, pairs: &[(&str, &str)]) -> Handle {
        let entries = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        self.store
            .borrow_mut()
            .insert(Entity::Dictionary { entries })
    }

    /// Attach `dictionary` to `topology`, replacing any previous one
    pub fn set_dictionary(&self, topology: Handle, dictionary: Handle) -> KernelResult<()> {
        let mut store = self.store.borrow_mut();
        store.get(topology)?;
        match store.get(dictionary)? {
            Entity::Dictionary { .. } => {
                store.dictionaries.insert(topology, dictionary);
                Ok(())
            }
            _ => Err(KernelError::NotA {
                handle: dictionary,
                expected: "dictionary",
            }),
        }
    }

    pub fn dictionary_of(&self, topology: Handle) -> Option<Handle> {
        self.store.borrow().dictionaries.get(&topology).copied()
    }
}

impl Kernel for MockKernel {
    fn type_tag(&self, handle: Handle) -> KernelResult<u32> {
        Ok(self.store.borrow().get(handle)?.type_tag())
    }

    fn vertex_by_coordinates(&self, coordinates: [f64; 3]) -> KernelResult<Handle> {
        let position = DVec3::from_array(coordinates);
        if !position.is_finite() {
            return Err(KernelError::Construction(format!(
                "vertex coordinates {coordinates:?} are not finite"
            )));
        }
        Ok(self.store.borrow_mut().insert(Entity::Vertex(position)))
    }

    fn vertex_coordinates(&self, vertex: &Vertex) -> KernelResult<[f64; 3]> {
        Ok(self.store.borrow().position(vertex.handle())?.to_array())
    }

    fn edge_by_vertices(&self, start: &Vertex, end: &Vertex) -> KernelResult<Handle> {
        let mut store = self.store.borrow_mut();
        if store.same_point(start.handle(), end.handle())? {
            return Err(KernelError::Construction(
                "edge endpoints coincide".to_string(),
            ));
        }
        Ok(store.insert(Entity::Edge {
            start: start.handle(),
            end: end.handle(),
        }))
    }

    fn wire_by_edges(&self, edges: &[Edge]) -> KernelResult<Handle> {
        let mut store = self.store.borrow_mut();
        let Some(first) = edges.first() else {
            return Err(KernelError::Construction("a wire needs at least one edge".to_string()));
        };

        let (start, end) = store.edge_ends(first.handle())?;
        let mut chain = vec![start, end];
        // Orient the first edge so that it leads into the second
        if let Some(second) = edges.get(1) {
            let (s, e) = store.edge_ends(second.handle())?;
            let leads_in = store.same_point(end, s)? || store.same_point(end, e)?;
            if !leads_in && (store.same_point(start, s)? || store.same_point(start, e)?) {
                chain.reverse();
            }
        }

        for edge in &edges[1..] {
            let (s, e) = store.edge_ends(edge.handle())?;
            let last = chain[chain.len() - 1];
            if store.same_point(last, s)? {
                chain.push(e);
            } else if store.same_point(last, e)? {
                chain.push(s);
            } else {
                return Err(KernelError::Construction(
                    "edges do not form a connected chain".to_string(),
                ));
            }
        }

        let closed = edges.len() > 1 && store.same_point(chain[0], chain[chain.len() - 1])?;
        if closed {
            chain.pop();
        }

        Ok(store.insert(Entity::Wire {
            edges: edges.iter().map(Edge::handle).collect(),
            vertices: chain,
            closed,
        }))
    }

    fn face_by_external_boundary(&self, boundary: &Wire) -> KernelResult<Handle> {
        let mut store = self.store.borrow_mut();
        let (ring, closed) = store.wire_loop(boundary.handle())?;
        if !closed || ring.len() < 3 {
            return Err(KernelError::Construction(
                "face boundary must be a closed wire with at least three vertices".to_string(),
            ));
        }
        let vertices = ring.to_vec();
        Ok(store.insert(Entity::Face {
            boundary: boundary.handle(),
            vertices,
        }))
    }

    fn shell_by_faces(&self, faces: &[Face]) -> KernelResult<Handle> {
        let mut store = self.store.borrow_mut();
        if faces.is_empty() {
            return Err(KernelError::Construction("a shell needs at least one face".to_string()));
        }
        let counts = store.segment_counts(faces, DEFAULT_TOLERANCE)?;
        if counts.values().any(|&count| count > 2) {
            return Err(KernelError::Construction(
                "faces of a shell may share each edge at most once".to_string(),
            ));
        }
        if !store.is_connected(faces)? {
            return Err(KernelError::Construction("shell faces are not connected".to_string()));
        }
        Ok(store.insert(Entity::Shell {
            faces: faces.iter().map(Face::handle).collect(),
        }))
    }

    fn cell_by_faces(&self, faces: &[Face]) -> KernelResult<Handle> {
        let mut store = self.store.borrow_mut();
        let counts = store.segment_counts(faces, DEFAULT_TOLERANCE)?;
        if faces.len() < 4 || counts.values().any(|&count| count != 2) {
            return Err(KernelError::Construction(
                "faces do not enclose a single closed shell".to_string(),
            ));
        }
        Ok(store.insert(Entity::Cell {
            faces: faces.iter().map(Face::handle).collect(),
        }))
    }

    fn cell_complex_by_faces(&self, faces: &[Face], tolerance: f64) -> KernelResult<Handle> {
        let mut store = self.store.borrow_mut();
        let tolerance = if tolerance > 0.0 { tolerance } else { DEFAULT_TOLERANCE };
        let counts = store.segment_counts(faces, tolerance)?;
        let closed = counts.values().all(|&count| count >= 2);
        let partitioned = counts.values().any(|&count| count > 2);
        if faces.len() < 4 || !closed || !partitioned {
            return Err(KernelError::Construction(
                "faces do not form a partitioned closed volume".to_string(),
            ));
        }
        Ok(store.insert(Entity::CellComplex {
            parts: faces.iter().map(Face::handle).collect(),
        }))
    }

    fn cluster_by_topologies(&self, members: &[Handle]) -> KernelResult<Handle> {
        let mut store = self.store.borrow_mut();
        if members.is_empty() {
            return Err(KernelError::Construction("a cluster needs at least one member".to_string()));
        }
        for member in members {
            store.get(*member)?;
        }
        Ok(store.insert(Entity::Cluster {
            members: members.to_vec(),
        }))
    }

    fn cell_by_loft(&self, wires: &[Wire]) -> KernelResult<Handle> {
        let mut store = self.store.borrow_mut();
        if wires.len() < 2 {
            return Err(KernelError::Construction("lofting needs at least two wires".to_string()));
        }

        let mut rings = Vec::with_capacity(wires.len());
        for wire in wires {
            let (ring, closed) = store.wire_loop(wire.handle())?;
            if !closed {
                return Err(KernelError::Construction("loft sections must be closed wires".to_string()));
            }
            rings.push(ring.to_vec());
        }
        let sides = rings[0].len();
        if rings.iter().any(|ring| ring.len() != sides) {
            return Err(KernelError::Construction(
                "loft sections must have the same number of vertices".to_string(),
            ));
        }

        let mut faces = vec![store.face_from_ring(&rings[0])];
        for pair in rings.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            for i in 0..sides {
                let j = (i + 1) % sides;
                faces.push(store.face_from_ring(&[lower[i], lower[j], upper[j], upper[i]]));
            }
        }
        faces.push(store.face_from_ring(&rings[rings.len() - 1]));

        Ok(store.insert(Entity::Cell { faces }))
    }

    fn union(&self, a: Handle, b: Handle, transfer_dictionary: bool) -> KernelResult<Handle> {
        let mut store = self.store.borrow_mut();
        let first = store.get(a)?.clone();
        let second = store.get(b)?.clone();
        if a == b {
            return Ok(a);
        }

        let touching = !store.point_keys(a)?.is_disjoint(&store.point_keys(b)?);
        let result = if first.is_solid() && second.is_solid() && touching {
            let parts = [(a, first), (b, second)]
                .into_iter()
                .flat_map(|(handle, entity)| match entity {
                    Entity::CellComplex { parts } => parts,
                    _ => vec![handle],
                })
                .collect();
            store.insert(Entity::CellComplex { parts })
        } else {
            let members = [(a, first), (b, second)]
                .into_iter()
                .flat_map(|(handle, entity)| match entity {
                    Entity::Cluster { members } => members,
                    _ => vec![handle],
                })
                .collect();
            store.insert(Entity::Cluster { members })
        };

        if transfer_dictionary {
            if let Some(dictionary) = store.merged_dictionary(&[a, b])? {
                store.dictionaries.insert(result, dictionary);
            }
        }
        Ok(result)
    }

    fn distance(&self, vertex: &Vertex, topology: Handle) -> KernelResult<f64> {
        let store = self.store.borrow();
        let point = store.position(vertex.handle())?;
        let mut vertices = Vec::new();
        let mut segments = Vec::new();
        store.explode(topology, &mut vertices, &mut segments)?;

        let mut best: Option<f64> = None;
        for other in vertices {
            let d = point.distance(store.position(other)?);
            best = Some(best.map_or(d, |b| b.min(d)));
        }
        for (start, end) in segments {
            let d = point_segment_distance(point, store.position(start)?, store.position(end)?);
            best = Some(best.map_or(d, |b| b.min(d)));
        }
        best.ok_or_else(|| KernelError::Construction("topology has no vertices".to_string()))
    }

    fn internal_vertex(&self, face: &Face) -> KernelResult<Handle> {
        let mut store = self.store.borrow_mut();
        let ring = store.face_loop(face.handle())?;
        let mut sum = DVec3::ZERO;
        for vertex in ring {
            sum += store.position(*vertex)?;
        }
        let centroid = sum / ring.len() as f64;
        Ok(store.insert(Entity::Vertex(centroid)))
    }

    fn adjacent_faces(&self, face: &Face) -> KernelResult<Vec<Handle>> {
        let store = self.store.borrow();
        let own: HashSet<SegmentKey> = store
            .face_segments(face.handle(), DEFAULT_TOLERANCE)?
            .into_iter()
            .collect();

        let mut adjacent = Vec::new();
        for handle in &store.order {
            if *handle == face.handle() || !matches!(store.get(*handle)?, Entity::Face { .. }) {
                continue;
            }
            let shares_edge = store
                .face_segments(*handle, DEFAULT_TOLERANCE)?
                .iter()
                .any(|segment| own.contains(segment));
            if shares_edge {
                adjacent.push(*handle);
            }
        }
        Ok(adjacent)
    }

    fn dictionary_keys(&self, dictionary: Handle) -> KernelResult<Vec<String>> {
        match self.store.borrow().get(dictionary)? {
            Entity::Dictionary { entries } => Ok(entries.iter().map(|(key, _)| key.clone()).collect()),
            _ => Err(KernelError::NotA {
                handle: dictionary,
                expected: "dictionary",
            }),
        }
    }

    fn shortest_paths(
        &self,
        graph: Handle,
        start: &Vertex,
        end: &Vertex,
        vertex_key: &str,
        edge_key: &str,
        time_limit: Duration,
    ) -> KernelResult<Vec<Handle>> {
        let started = Instant::now();
        let mut store = self.store.borrow_mut();
        let (nodes, links) = match store.get(graph)? {
            Entity::Graph { vertices, edges } => (vertices.clone(), edges.clone()),
            _ => {
                return Err(KernelError::NotA {
                    handle: graph,
                    expected: "graph",
                })
            }
        };
        if !vertex_key.is_empty() || !edge_key.is_empty() {
            debug!("MockKernel ignores path weights ('{vertex_key}', '{edge_key}')");
        }

        let locate = |store: &Store, vertex: &Vertex| -> KernelResult<usize> {
            let key = point_key(store.position(vertex.handle())?, DEFAULT_TOLERANCE);
            for (index, node) in nodes.iter().enumerate() {
                if point_key(store.position(*node)?, DEFAULT_TOLERANCE) == key {
                    return Ok(index);
                }
            }
            Err(KernelError::Construction("vertex is not part of the graph".to_string()))
        };
        let source = locate(&*store, start)?;
        let target = locate(&*store, end)?;
        if source == target {
            return Ok(Vec::new());
        }

        let mut neighbours = vec![Vec::new(); nodes.len()];
        for &(a, b) in &links {
            neighbours[a].push(b);
            neighbours[b].push(a);
        }
        for list in &mut neighbours {
            list.sort_unstable();
            list.dedup();
        }

        // Breadth-first distances from the source
        let mut distance = vec![usize::MAX; nodes.len()];
        distance[source] = 0;
        let mut queue = VecDeque::from([source]);
        while let Some(current) = queue.pop_front() {
            for &next in &neighbours[current] {
                if distance[next] == usize::MAX {
                    distance[next] = distance[current] + 1;
                    queue.push_back(next);
                }
            }
        }
        if distance[target] == usize::MAX {
            return Ok(Vec::new());
        }

        // Walk back from the target along strictly decreasing distances
        let mut paths: Vec<Vec<usize>> = Vec::new();
        let mut stack = vec![vec![target]];
        while let Some(partial) = stack.pop() {
            if started.elapsed() > time_limit {
                if paths.is_empty() {
                    return Err(KernelError::TimedOut(time_limit));
                }
                debug!("MockKernel shortest paths stopped at the time limit");
                break;
            }
            let head = partial[partial.len() - 1];
            if head == source {
                paths.push(partial.into_iter().rev().collect());
                if paths.len() == MAX_PATHS {
                    break;
                }
                continue;
            }
            for &previous in neighbours[head].iter().rev() {
                if distance[previous].checked_add(1) == Some(distance[head]) {
                    let mut extended = partial.clone();
                    extended.push(previous);
                    stack.push(extended);
                }
            }
        }

        Ok(paths
            .iter()
            .map(|path| {
                let vertices: Vec<Handle> = path.iter().map(|&index| nodes[index]).collect();
                store.wire_through(&vertices)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(kernel: &MockKernel, coordinates: [f64; 3]) -> Vertex {
        let handle = kernel.vertex_by_coordinates(coordinates).unwrap();
        kernel.narrow(handle).unwrap().into_vertex().unwrap()
    }

    fn edge(kernel: &MockKernel, a: &Vertex, b: &Vertex) -> Edge {
        let handle = kernel.edge_by_vertices(a, b).unwrap();
        kernel.narrow(handle).unwrap().into_edge().unwrap()
    }

    fn square_wire(kernel: &MockKernel, z: f64) -> Wire {
        let corners: Vec<Vertex> = [[0.0, 0.0, z], [1.0, 0.0, z], [1.0, 1.0, z], [0.0, 1.0, z]]
            .into_iter()
            .map(|c| vertex(kernel, c))
            .collect();
        let edges: Vec<Edge> = (0..4)
            .map(|i| edge(kernel, &corners[i], &corners[(i + 1) % 4]))
            .collect();
        let handle = kernel.wire_by_edges(&edges).unwrap();
        kernel.narrow(handle).unwrap().into_wire().unwrap()
    }

    #[test]
    fn test_type_tags() {
        let kernel = MockKernel::new();
        let v = vertex(&kernel, [0.0, 0.0, 0.0]);
        assert_eq!(kernel.type_tag(v.handle()).unwrap(), 1);
        assert!(matches!(
            kernel.type_tag(Handle::new()),
            Err(KernelError::UnknownHandle(_))
        ));
    }

    #[test]
    fn test_closed_wire_and_face() {
        let kernel = MockKernel::new();
        let wire = square_wire(&kernel, 0.0);
        let face = kernel.face_by_external_boundary(&wire).unwrap();
        assert_eq!(kernel.narrow(face).unwrap().topology_type(), TopologyType::Face);
    }

    #[test]
    fn test_open_wire_cannot_bound_a_face() {
        let kernel = MockKernel::new();
        let a = vertex(&kernel, [0.0, 0.0, 0.0]);
        let b = vertex(&kernel, [1.0, 0.0, 0.0]);
        let c = vertex(&kernel, [1.0, 1.0, 0.0]);
        let edges = [edge(&kernel, &a, &b), edge(&kernel, &b, &c)];
        let wire = kernel.wire_by_edges(&edges).unwrap();
        let wire = kernel.narrow(wire).unwrap().into_wire().unwrap();
        assert!(kernel.face_by_external_boundary(&wire).is_err());
    }

    #[test]
    fn test_disconnected_edges_are_rejected() {
        let kernel = MockKernel::new();
        let a = vertex(&kernel, [0.0, 0.0, 0.0]);
        let b = vertex(&kernel, [1.0, 0.0, 0.0]);
        let c = vertex(&kernel, [5.0, 5.0, 0.0]);
        let d = vertex(&kernel, [6.0, 5.0, 0.0]);
        let edges = [edge(&kernel, &a, &b), edge(&kernel, &c, &d)];
        assert!(matches!(
            kernel.wire_by_edges(&edges),
            Err(KernelError::Construction(_))
        ));
    }

    #[test]
    fn test_loft_and_union_of_touching_cells() {
        let kernel = MockKernel::new();
        let wires = [square_wire(&kernel, 0.0), square_wire(&kernel, 1.0), square_wire(&kernel, 2.0)];
        let lower = kernel.cell_by_loft(&wires[0..2]).unwrap();
        let upper = kernel.cell_by_loft(&wires[1..3]).unwrap();
        assert_eq!(kernel.type_tag(lower).unwrap(), 32);

        let merged = kernel.union(lower, upper, false).unwrap();
        assert_eq!(kernel.narrow(merged).unwrap().topology_type(), TopologyType::CellComplex);
    }

    #[test]
    fn test_union_of_apart_topologies_is_cluster() {
        let kernel = MockKernel::new();
        let a = vertex(&kernel, [0.0, 0.0, 0.0]);
        let b = vertex(&kernel, [3.0, 0.0, 0.0]);
        let merged = kernel.union(a.handle(), b.handle(), false).unwrap();
        assert_eq!(kernel.type_tag(merged).unwrap(), 128);
    }

    #[test]
    fn test_union_transfers_dictionaries() {
        let kernel = MockKernel::new();
        let a = vertex(&kernel, [0.0, 0.0, 0.0]);
        let b = vertex(&kernel, [3.0, 0.0, 0.0]);
        let dict_a = kernel.dictionary_by_pairs(&[("name", "a"), ("floor", "1")]);
        let dict_b = kernel.dictionary_by_pairs(&[("name", "b"), ("room", "kitchen")]);
        kernel.set_dictionary(a.handle(), dict_a).unwrap();
        kernel.set_dictionary(b.handle(), dict_b).unwrap();

        let plain = kernel.union(a.handle(), b.handle(), false).unwrap();
        assert!(kernel.dictionary_of(plain).is_none());

        let merged = kernel.union(a.handle(), b.handle(), true).unwrap();
        let dictionary = kernel.dictionary_of(merged).unwrap();
        assert_eq!(
            kernel.dictionary_keys(dictionary).unwrap(),
            vec!["name", "floor", "room"]
        );
    }

    #[test]
    fn test_distance_to_edge_segment() {
        let kernel = MockKernel::new();
        let a = vertex(&kernel, [0.0, 0.0, 0.0]);
        let b = vertex(&kernel, [2.0, 0.0, 0.0]);
        let e = edge(&kernel, &a, &b);
        let point = vertex(&kernel, [1.0, 3.0, 0.0]);
        let d = kernel.distance(&point, e.handle()).unwrap();
        assert!((d - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_internal_vertex_is_centroid() {
        let kernel = MockKernel::new();
        let wire = square_wire(&kernel, 0.0);
        let face = kernel.face_by_external_boundary(&wire).unwrap();
        let face = kernel.narrow(face).unwrap().into_face().unwrap();
        let inside = kernel.internal_vertex(&face).unwrap();
        let inside = kernel.narrow(inside).unwrap().into_vertex().unwrap();
        assert_eq!(kernel.vertex_coordinates(&inside).unwrap(), [0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_shortest_paths_on_a_square() {
        let kernel = MockKernel::new();
        let corners: Vec<Vertex> = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]
            .into_iter()
            .map(|c| vertex(&kernel, c))
            .collect();
        let edges: Vec<Edge> = (0..4)
            .map(|i| edge(&kernel, &corners[i], &corners[(i + 1) % 4]))
            .collect();
        let graph = kernel.graph_by_edges(&edges).unwrap();

        // Opposite corners: two routes of two edges each
        let paths = kernel
            .shortest_paths(graph, &corners[0], &corners[2], "", "", Duration::from_secs(10))
            .unwrap();
        assert_eq!(paths.len(), 2);
        for path in paths {
            assert_eq!(kernel.type_tag(path).unwrap(), 4);
        }

        let neighbours = kernel
            .shortest_paths(graph, &corners[0], &corners[1], "", "", Duration::from_secs(10))
            .unwrap();
        assert_eq!(neighbours.len(), 1);
    }

    #[test]
    fn test_shortest_paths_rejects_non_graph() {
        let kernel = MockKernel::new();
        let a = vertex(&kernel, [0.0, 0.0, 0.0]);
        let result = kernel.shortest_paths(a.handle(), &a, &a, "", "", Duration::from_secs(1));
        assert!(matches!(result, Err(KernelError::NotA { expected: "graph", .. })));
    }
}
