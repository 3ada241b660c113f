use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use tracing::{trace, warn};
use z3::ast::{Ast, Int};
use z3::{Context, SatResult, Solver};

use crate::config::{CANDIDATE_PATH_WIDTH, CEGAR_ITERATION_SLACK};
use crate::intent::{IntentIndex, IntentKind, IntentSet};
use crate::path_cost::WeightedGraph;
use crate::topology::{NodeId, Topology};

pub type Subset = BTreeSet<IntentIndex>;

/// Outcome of an oracle check, cached by subset identity.
#[derive(Debug, Clone)]
pub enum Verdict {
    Sat,
    Unsat,
    /// The CEGAR loop did not converge within its iteration cap. The driver treats
    /// this as UNSAT conservatively, but it is tallied separately in diagnostics.
    Indeterminate { iterations: usize },
}

impl Verdict {
    pub fn is_sat(&self) -> bool {
        matches!(self, Verdict::Sat)
    }
}

/// Decides satisfiability of a subset of intents under shortest-path routing
/// semantics via CEGAR over an integer-arithmetic SMT context.
///
/// Owns a single persistent `Solver`; every `check` pushes exactly one scope and
/// pops it on every exit path, successful or not.
pub struct Oracle<'ctx> {
    ctx: &'ctx Context,
    solver: Solver<'ctx>,
    edge_vars: HashMap<(NodeId, NodeId), Int<'ctx>>,
    topology: Topology,
    intents: IntentSet,
    cache: RefCell<HashMap<Subset, Verdict>>,
}

impl<'ctx> Oracle<'ctx> {
    pub fn new(ctx: &'ctx Context, topology: Topology, intents: IntentSet) -> Self {
        let solver = Solver::new(ctx);
        let mut edge_vars = HashMap::new();
        for (u, v) in topology.directed_edges() {
            let var = Int::new_const(ctx, format!("w[{u}->{v}]"));
            solver.assert(&var.ge(&Int::from_i64(ctx, 1)));
            edge_vars.insert((u, v), var);
        }
        Self {
            ctx,
            solver,
            edge_vars,
            topology,
            intents,
            cache: RefCell::new(HashMap::new()),
        }
    }

    fn edge_term(&self, u: &str, v: &str) -> &Int<'ctx> {
        self.edge_vars
            .get(&(u.to_string(), v.to_string()))
            .unwrap_or_else(|| panic!("topology has no directed edge ({u}, {v})"))
    }

    fn cost_term(&self, path: &[NodeId]) -> Int<'ctx> {
        let terms: Vec<Int<'ctx>> = path.windows(2).map(|w| self.edge_term(&w[0], &w[1]).clone()).collect();
        let refs: Vec<&Int<'ctx>> = terms.iter().collect();
        Int::add(self.ctx, &refs)
    }

    fn assert_declared_constraints(&self, kind: &IntentKind) {
        match kind {
            IntentKind::Simple { .. } => {}
            IntentKind::PathPreference { primary, secondary } => {
                let lhs = self.cost_term(primary);
                let rhs = self.cost_term(secondary);
                self.solver.assert(&lhs.lt(&rhs));
            }
            IntentKind::Ecmp { paths } => {
                let first = self.cost_term(&paths[0]);
                for other in &paths[1..] {
                    let term = self.cost_term(other);
                    self.solver.assert(&first._eq(&term));
                }
            }
        }
    }

    fn concrete_graph(&self, model: &z3::Model<'ctx>) -> WeightedGraph {
        let mut weights = HashMap::new();
        for ((u, v), term) in &self.edge_vars {
            let value = model
                .eval(term, true)
                .and_then(|v| v.as_i64())
                .expect("model must assign every edge weight");
            weights.insert((u.clone(), v.clone()), value);
        }
        WeightedGraph::new(&self.topology, weights)
    }

    /// Adds counterexample constraints for one intent against the current model's
    /// concrete graph. Returns whether any new constraint was added.
    fn refine_for_intent(&self, kind: &IntentKind, graph: &WeightedGraph) -> bool {
        let width = CANDIDATE_PATH_WIDTH.get();
        let mut added = false;
        match kind {
            IntentKind::Simple { path } | IntentKind::PathPreference { primary: path, .. } => {
                let (src, dst) = (path[0].clone(), path[path.len() - 1].clone());
                let declared = match kind {
                    IntentKind::PathPreference { secondary, .. } => vec![path.clone(), secondary.clone()],
                    _ => vec![path.clone()],
                };
                let primary_cost = self.cost_term(path);
                let declared_cost = graph.path_cost(path);
                for (candidate, candidate_cost_concrete) in self.topology_k_shortest(graph, &src, &dst, width) {
                    if declared.contains(&candidate) {
                        continue;
                    }
                    if candidate_cost_concrete > declared_cost {
                        continue;
                    }
                    let candidate_cost = self.cost_term(&candidate);
                    trace!(?src, ?dst, "adding counterexample constraint against undeclared path");
                    self.solver.assert(&primary_cost.lt(&candidate_cost));
                    added = true;
                }
            }
            IntentKind::Ecmp { paths } => {
                let (src, dst) = (paths[0][0].clone(), paths[0][paths[0].len() - 1].clone());
                let declared: BTreeSet<_> = paths.iter().cloned().collect();
                let primary_cost = self.cost_term(&paths[0]);
                for candidate in graph.all_shortest_paths(&src, &dst, width) {
                    if declared.contains(&candidate) {
                        continue;
                    }
                    let candidate_cost = self.cost_term(&candidate);
                    trace!(?src, ?dst, "adding ECMP exclusion constraint against undeclared shortest path");
                    self.solver.assert(&primary_cost.lt(&candidate_cost));
                    added = true;
                }
            }
        }
        added
    }

    fn topology_k_shortest(
        &self,
        graph: &WeightedGraph,
        src: &NodeId,
        dst: &NodeId,
        width: usize,
    ) -> Vec<(Vec<NodeId>, i64)> {
        graph.k_shortest_paths(src, dst, width)
    }

    /// Decides SAT/UNSAT for `subset`, consulting and populating the cache.
    pub fn check(&self, subset: &Subset) -> Verdict {
        if subset.is_empty() {
            return Verdict::Sat;
        }
        if let Some(cached) = self.cache.borrow().get(subset) {
            trace!(size = subset.len(), "oracle cache hit");
            return cached.clone();
        }
        trace!(size = subset.len(), "oracle cache miss, running CEGAR");

        self.solver.push();
        for &idx in subset {
            self.assert_declared_constraints(&self.intents.get(idx).kind);
        }

        let cap = 2 * subset.len() + CEGAR_ITERATION_SLACK.get() as usize;
        let mut verdict = None;
        for iteration in 0..cap {
            match self.solver.check() {
                SatResult::Unsat => {
                    verdict = Some(Verdict::Unsat);
                    break;
                }
                SatResult::Unknown => {
                    warn!("z3 returned unknown during CEGAR check, treating as indeterminate");
                    verdict = Some(Verdict::Indeterminate { iterations: iteration });
                    break;
                }
                SatResult::Sat => {
                    let model = self.solver.get_model().expect("sat result must produce a model");
                    let graph = self.concrete_graph(&model);
                    let mut added_any = false;
                    for &idx in subset {
                        if self.refine_for_intent(&self.intents.get(idx).kind, &graph) {
                            added_any = true;
                        }
                    }
                    if !added_any {
                        verdict = Some(Verdict::Sat);
                        break;
                    }
                }
            }
        }
        let verdict = verdict.unwrap_or(Verdict::Indeterminate { iterations: cap });
        if let Verdict::Indeterminate { iterations } = &verdict {
            warn!(subset_size = subset.len(), iterations, "CEGAR loop hit its iteration cap");
        }
        self.solver.pop(1);
        self.cache.borrow_mut().insert(subset.clone(), verdict.clone());
        verdict
    }

    pub fn intents(&self) -> &IntentSet {
        &self.intents
    }
}
