//! Topology.ByGeometry operations

use log::{debug, error};

use super::parameters::ByGeometryParameters;
use crate::error::{NodeError, NodeResult};
use crate::kernel::Kernel;
use crate::nodes::interface::{NodeInputs, NodeOutputs, SocketData, Value};
use crate::ragged::Ragged;
use crate::topology::{Edge, Face, Handle, TypedHandle, Vertex};

pub const NODE_TYPE: &str = "Topology.ByGeometry";

pub fn process_by_geometry(kernel: &dyn Kernel, inputs: &NodeInputs) -> NodeResult<NodeOutputs> {
    let mut outputs = NodeOutputs::new()
        .with("Topology", Ragged::empty())
        .with("Vertices", Ragged::empty())
        .with("Edges", Ragged::empty())
        .with("Faces", Ragged::empty());

    let params: ByGeometryParameters = inputs.params(NODE_TYPE)?;
    let tolerance = inputs
        .lane("Tol", Value::Float(params.tol))?
        .first()
        .and_then(Value::as_f64)
        .unwrap_or(params.tol);

    let coordinates = read_coordinates(inputs)?;
    if coordinates.is_empty() {
        debug!("{NODE_TYPE}: no vertices, nothing to build");
        return Ok(outputs);
    }

    let vertices = coordinates
        .iter()
        .map(|&point| {
            let handle = kernel
                .vertex_by_coordinates(point)
                .map_err(NodeError::kernel("Vertex.ByCoordinates"))?;
            kernel
                .narrow(handle)
                .and_then(TypedHandle::into_vertex)
                .map_err(NodeError::kernel("Vertex.ByCoordinates"))
        })
        .collect::<NodeResult<Vec<Vertex>>>()?;
    outputs.set("Vertices", handles_socket(vertices.iter().map(Vertex::handle)));

    let loops = read_indices(inputs, "Faces", 3)?;
    if !loops.is_empty() {
        let faces = loops
            .iter()
            .map(|ring| face_by_ring(kernel, &vertices, ring))
            .collect::<NodeResult<Vec<Face>>>()?;
        outputs.set("Faces", handles_socket(faces.iter().map(Face::handle)));
        outputs.set("Topology", topology_socket(topology_by_faces(kernel, &faces, tolerance)));
        return Ok(outputs);
    }

    let pairs = read_indices(inputs, "Edges", 2)?;
    if !pairs.is_empty() {
        let edges = pairs
            .iter()
            .map(|pair| edge_between(kernel, &vertices, pair[0], pair[1]))
            .collect::<NodeResult<Vec<Edge>>>()?;
        outputs.set("Edges", handles_socket(edges.iter().map(Edge::handle)));
        outputs.set("Topology", topology_socket(topology_by_edges(kernel, &edges)));
        return Ok(outputs);
    }

    let members: Vec<Handle> = vertices.iter().map(Vertex::handle).collect();
    let cluster = match kernel
        .cluster_by_topologies(&members)
        .and_then(|handle| kernel.narrow(handle))
    {
        Ok(cluster) => Some(cluster),
        Err(err) => {
            error!("{NODE_TYPE}: could not cluster the vertices: {err}");
            None
        }
    };
    outputs.set("Topology", topology_socket(cluster));
    Ok(outputs)
}

/// Best topology for a set of faces, trying the richest class first
pub fn topology_by_faces(kernel: &dyn Kernel, faces: &[Face], tolerance: f64) -> Option<TypedHandle> {
    if let [face] = faces {
        return kernel.narrow(face.handle()).ok();
    }
    let members: Vec<Handle> = faces.iter().map(Face::handle).collect();
    let built = kernel
        .cell_by_faces(faces)
        .or_else(|err| {
            debug!("{NODE_TYPE}: not a cell ({err})");
            kernel.cell_complex_by_faces(faces, tolerance)
        })
        .or_else(|err| {
            debug!("{NODE_TYPE}: not a cell complex ({err})");
            kernel.shell_by_faces(faces)
        })
        .or_else(|err| {
            debug!("{NODE_TYPE}: not a shell ({err})");
            kernel.cluster_by_topologies(&members)
        })
        .and_then(|handle| kernel.narrow(handle));

    match built {
        Ok(topology) => Some(topology),
        Err(err) => {
            error!("{NODE_TYPE}: could not create a topology from the faces: {err}");
            None
        }
    }
}

/// A single edge as-is, otherwise a wire, otherwise a cluster
pub fn topology_by_edges(kernel: &dyn Kernel, edges: &[Edge]) -> Option<TypedHandle> {
    if let [edge] = edges {
        return kernel.narrow(edge.handle()).ok();
    }
    let members: Vec<Handle> = edges.iter().map(Edge::handle).collect();
    let built = kernel
        .wire_by_edges(edges)
        .or_else(|err| {
            debug!("{NODE_TYPE}: not a wire ({err})");
            kernel.cluster_by_topologies(&members)
        })
        .and_then(|handle| kernel.narrow(handle));

    match built {
        Ok(topology) => Some(topology),
        Err(err) => {
            error!("{NODE_TYPE}: could not create a topology from the edges: {err}");
            None
        }
    }
}

fn edge_between(kernel: &dyn Kernel, vertices: &[Vertex], start: usize, end: usize) -> NodeResult<Edge> {
    let handle = kernel
        .edge_by_vertices(vertex_at(vertices, start)?, vertex_at(vertices, end)?)
        .map_err(NodeError::kernel("Edge.ByVertices"))?;
    kernel
        .narrow(handle)
        .and_then(TypedHandle::into_edge)
        .map_err(NodeError::kernel("Edge.ByVertices"))
}

/// Closed face through `ring`, an index loop into `vertices`
fn face_by_ring(kernel: &dyn Kernel, vertices: &[Vertex], ring: &[usize]) -> NodeResult<Face> {
    let edges = (0..ring.len())
        .map(|i| edge_between(kernel, vertices, ring[i], ring[(i + 1) % ring.len()]))
        .collect::<NodeResult<Vec<Edge>>>()?;
    let wire = kernel
        .wire_by_edges(&edges)
        .and_then(|handle| kernel.narrow(handle))
        .and_then(TypedHandle::into_wire)
        .map_err(NodeError::kernel("Wire.ByEdges"))?;
    kernel
        .face_by_external_boundary(&wire)
        .and_then(|handle| kernel.narrow(handle))
        .and_then(TypedHandle::into_face)
        .map_err(NodeError::kernel("Face.ByExternalBoundary"))
}

fn vertex_at(vertices: &[Vertex], index: usize) -> NodeResult<&Vertex> {
    vertices.get(index).ok_or_else(|| {
        NodeError::InvalidInput(format!(
            "vertex index {index} is out of range ({} vertices)",
            vertices.len()
        ))
    })
}

fn read_coordinates(inputs: &NodeInputs) -> NodeResult<Vec<[f64; 3]>> {
    let Some(socket) = inputs.socket("Vertices") else {
        return Ok(Vec::new());
    };
    socket
        .clone()
        .flattened()?
        .into_iter()
        .map(|value| match value {
            Value::Vector(point) => Ok(point),
            other => Err(NodeError::InvalidInput(format!(
                "Vertices expects vectors, got {}",
                other.type_name()
            ))),
        })
        .collect()
}

/// Index lists from socket `name`, each at least `min_len` long
fn read_indices(inputs: &NodeInputs, name: &str, min_len: usize) -> NodeResult<Vec<Vec<usize>>> {
    let Some(socket) = inputs.socket(name) else {
        return Ok(Vec::new());
    };
    socket
        .clone()
        .flattened()?
        .into_iter()
        .map(|value| match value {
            Value::Indices(indices) if indices.len() >= min_len => Ok(indices),
            other => Err(NodeError::InvalidInput(format!(
                "{name} expects index lists of at least {min_len} entries, got {other:?}"
            ))),
        })
        .collect()
}

fn handles_socket(handles: impl Iterator<Item = Handle>) -> SocketData {
    Ragged::list(handles.map(Value::Handle))
}

fn topology_socket(topology: Option<TypedHandle>) -> SocketData {
    Ragged::list(vec![Value::from(topology)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MockKernel;
    use crate::topology::TopologyType;
    use serde_json::json;

    const CUBE: [[f64; 3]; 8] = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ];

    const CUBE_FACES: [[usize; 4]; 6] = [
        [0, 1, 2, 3],
        [4, 5, 6, 7],
        [0, 1, 5, 4],
        [1, 2, 6, 5],
        [2, 3, 7, 6],
        [3, 0, 4, 7],
    ];

    fn mesh_inputs(vertices: &[[f64; 3]], faces: &[Vec<usize>], edges: &[[usize; 2]]) -> NodeInputs {
        let mut inputs = NodeInputs::new().with_socket(
            "Vertices",
            Ragged::list(vertices.iter().copied().map(Value::Vector)),
        );
        if !faces.is_empty() {
            inputs.set_socket(
                "Faces",
                Ragged::list(faces.iter().cloned().map(Value::Indices)),
            );
        }
        if !edges.is_empty() {
            inputs.set_socket(
                "Edges",
                Ragged::list(edges.iter().map(|pair| Value::Indices(pair.to_vec()))),
            );
        }
        inputs
    }

    fn topology_type(kernel: &MockKernel, outputs: &NodeOutputs) -> Option<TopologyType> {
        let values = outputs.get("Topology").unwrap().clone().flattened().unwrap();
        values[0]
            .as_handle()
            .map(|handle| kernel.narrow(handle).unwrap().topology_type())
    }

    #[test]
    fn test_closed_faces_become_a_cell() {
        let kernel = MockKernel::new();
        let faces: Vec<Vec<usize>> = CUBE_FACES.iter().map(|f| f.to_vec()).collect();
        let outputs = process_by_geometry(&kernel, &mesh_inputs(&CUBE, &faces, &[])).unwrap();

        assert_eq!(topology_type(&kernel, &outputs), Some(TopologyType::Cell));
        assert_eq!(outputs.get("Vertices").unwrap().clone().flattened().unwrap().len(), 8);
        assert_eq!(outputs.get("Faces").unwrap().clone().flattened().unwrap().len(), 6);
        assert_eq!(outputs.get("Edges"), Some(&Ragged::empty()));
    }

    #[test]
    fn test_open_faces_fall_back_to_a_shell() {
        let kernel = MockKernel::new();
        let faces: Vec<Vec<usize>> = CUBE_FACES[..3].iter().map(|f| f.to_vec()).collect();
        let outputs = process_by_geometry(&kernel, &mesh_inputs(&CUBE, &faces, &[])).unwrap();
        assert_eq!(topology_type(&kernel, &outputs), Some(TopologyType::Shell));
    }

    #[test]
    fn test_single_face_is_returned_directly() {
        let kernel = MockKernel::new();
        let outputs = process_by_geometry(&kernel, &mesh_inputs(&CUBE, &[vec![0, 1, 2, 3]], &[])).unwrap();
        assert_eq!(topology_type(&kernel, &outputs), Some(TopologyType::Face));
    }

    #[test]
    fn test_edges_become_a_wire_or_a_cluster() {
        let kernel = MockKernel::new();
        let chained = process_by_geometry(&kernel, &mesh_inputs(&CUBE, &[], &[[0, 1], [1, 2]])).unwrap();
        assert_eq!(topology_type(&kernel, &chained), Some(TopologyType::Wire));
        assert_eq!(chained.get("Edges").unwrap().clone().flattened().unwrap().len(), 2);

        let apart = process_by_geometry(&kernel, &mesh_inputs(&CUBE, &[], &[[0, 1], [6, 7]])).unwrap();
        assert_eq!(topology_type(&kernel, &apart), Some(TopologyType::Cluster));

        let single = process_by_geometry(&kernel, &mesh_inputs(&CUBE, &[], &[[0, 1]])).unwrap();
        assert_eq!(topology_type(&kernel, &single), Some(TopologyType::Edge));
    }

    #[test]
    fn test_bare_vertices_become_a_cluster() {
        let kernel = MockKernel::new();
        let outputs = process_by_geometry(&kernel, &mesh_inputs(&CUBE[..3], &[], &[])).unwrap();
        assert_eq!(topology_type(&kernel, &outputs), Some(TopologyType::Cluster));
    }

    #[test]
    fn test_no_vertices_gives_empty_outputs() {
        let kernel = MockKernel::new();
        let outputs = process_by_geometry(&kernel, &NodeInputs::new()).unwrap();
        assert_eq!(outputs.get("Topology"), Some(&Ragged::empty()));
        assert!(kernel.is_empty());
    }

    #[test]
    fn test_bad_index_is_invalid_input() {
        let kernel = MockKernel::new();
        let inputs = mesh_inputs(&CUBE[..3], &[vec![0, 1, 9]], &[]);
        assert!(matches!(
            process_by_geometry(&kernel, &inputs),
            Err(NodeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_tolerance_param_is_read() {
        let inputs = NodeInputs::new().with_params(json!({ "Tol": 0.01 }));
        let params: ByGeometryParameters = inputs.params(NODE_TYPE).unwrap();
        assert_eq!(params.tol, 0.01);
        assert_eq!(ByGeometryParameters::default().tol, 0.0001);
    }
}
