use crate::task::Task;
use crate::task_validation;
use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    InvalidTask(String),
    DanglingReference {
        task_id: String,
        predecessor_id: String,
    },
    CyclicDependency {
        cycle: Vec<String>,
    },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::InvalidTask(message) => write!(f, "invalid task record: {message}"),
            GraphError::DanglingReference {
                task_id,
                predecessor_id,
            } => write!(
                f,
                "task {task_id} references unknown predecessor {predecessor_id}"
            ),
            GraphError::CyclicDependency { cycle } => {
                write!(f, "dependency cycle among tasks: {}", cycle.join(", "))
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// The task set and its predecessor/successor structure. Built once from
/// ingested records; construction rejects invalid records, unknown
/// predecessor ids, and dependency cycles.
#[derive(Debug)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    graph: DiGraph<usize, ()>,
    node_of: HashMap<String, NodeIndex>,
    topo: Vec<usize>,
}

impl TaskGraph {
    pub fn build(tasks: Vec<Task>) -> Result<Self, GraphError> {
        task_validation::validate_task_collection(&tasks)
            .map_err(|err| GraphError::InvalidTask(err.to_string()))?;

        let mut graph: DiGraph<usize, ()> = DiGraph::new();
        let mut node_of: HashMap<String, NodeIndex> = HashMap::with_capacity(tasks.len());

        for (idx, task) in tasks.iter().enumerate() {
            let node = graph.add_node(idx);
            node_of.insert(task.id.clone(), node);
        }

        // Edges run predecessor -> successor.
        for task in &tasks {
            for predecessor_id in &task.predecessors {
                let Some(&pred_node) = node_of.get(predecessor_id) else {
                    return Err(GraphError::DanglingReference {
                        task_id: task.id.clone(),
                        predecessor_id: predecessor_id.clone(),
                    });
                };
                graph.add_edge(pred_node, node_of[&task.id], ());
            }
        }

        Self::reject_cycles(&graph, &tasks)?;
        let topo = Self::stable_topological_order(&graph, &node_of, &tasks);

        Ok(Self {
            tasks,
            graph,
            node_of,
            topo,
        })
    }

    /// Strongly connected components of size > 1 (or a self-loop) are exactly
    /// the tasks participating in a cycle.
    fn reject_cycles(graph: &DiGraph<usize, ()>, tasks: &[Task]) -> Result<(), GraphError> {
        let mut members: Vec<usize> = Vec::new();
        for component in tarjan_scc(graph) {
            if component.len() > 1 {
                members.extend(component.iter().map(|node| graph[*node]));
            } else if let Some(&only) = component.first() {
                if graph.find_edge(only, only).is_some() {
                    members.push(graph[only]);
                }
            }
        }

        if members.is_empty() {
            return Ok(());
        }
        members.sort_unstable();
        Err(GraphError::CyclicDependency {
            cycle: members
                .into_iter()
                .map(|idx| tasks[idx].id.clone())
                .collect(),
        })
    }

    /// Kahn's algorithm with a min-heap over input position, so tasks that
    /// become ready together keep their original input order.
    fn stable_topological_order(
        graph: &DiGraph<usize, ()>,
        node_of: &HashMap<String, NodeIndex>,
        tasks: &[Task],
    ) -> Vec<usize> {
        let mut in_degree: Vec<usize> = tasks
            .iter()
            .map(|task| task.predecessors.len())
            .collect();

        let mut ready = BinaryHeap::new();
        for (idx, degree) in in_degree.iter().enumerate() {
            if *degree == 0 {
                ready.push(Reverse(idx));
            }
        }

        let mut order = Vec::with_capacity(tasks.len());
        while let Some(Reverse(idx)) = ready.pop() {
            order.push(idx);
            let node = node_of[&tasks[idx].id];
            for succ_node in graph.neighbors_directed(node, Direction::Outgoing) {
                let succ_idx = graph[succ_node];
                in_degree[succ_idx] -= 1;
                if in_degree[succ_idx] == 0 {
                    ready.push(Reverse(succ_idx));
                }
            }
        }

        // Cycles were rejected above, so every task is in the order.
        order
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in their original input order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.node_of.get(id).map(|node| &self.tasks[self.graph[*node]])
    }

    /// Tasks in stable topological order (ties broken by input order).
    pub fn topological_order(&self) -> Vec<&Task> {
        self.topo.iter().map(|idx| &self.tasks[*idx]).collect()
    }

    pub fn predecessors_of(&self, id: &str) -> Option<Vec<&Task>> {
        self.neighbors_of(id, Direction::Incoming)
    }

    pub fn successors_of(&self, id: &str) -> Option<Vec<&Task>> {
        self.neighbors_of(id, Direction::Outgoing)
    }

    fn neighbors_of(&self, id: &str, direction: Direction) -> Option<Vec<&Task>> {
        let node = *self.node_of.get(id)?;
        let mut indices: Vec<usize> = self
            .graph
            .neighbors_directed(node, direction)
            .map(|neighbor| self.graph[neighbor])
            .collect();
        indices.sort_unstable();
        Some(indices.into_iter().map(|idx| &self.tasks[idx]).collect())
    }

    /// Tasks with no successors, in input order. The project-level slip is
    /// taken over these.
    pub fn terminal_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| {
                let node = self.node_of[&task.id];
                self.graph
                    .neighbors_directed(node, Direction::Outgoing)
                    .next()
                    .is_none()
            })
            .collect()
    }
}
