//! Bit-vector constraints lowered to CNF for a SAT core.
//!
//! The encoder only ever needs a small bit-vector theory: named variables,
//! equality against constants and other variables, unsigned comparison with a
//! constant bound, implication and biconditional. Everything is lowered
//! eagerly to CNF through Tseitin-encoded gate literals and handed to
//! `varisat` in one `check()` call per query.

use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tracing::debug;
use varisat::{CnfFormula, ExtendFormula, Lit, Solver, Var};

/// Outcome of a solver run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A satisfying assignment exists.
    Satisfiable,
    /// No satisfying assignment exists.
    Unsatisfiable,
    /// The solver gave up without an answer.
    Unknown,
}

/// A named bit-vector variable, least significant bit first.
#[derive(Debug, Clone)]
pub struct BitVec {
    id: usize,
    name: String,
    bits: Vec<Lit>,
}

impl BitVec {
    /// The variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bit width of the variable.
    pub fn width(&self) -> usize {
        self.bits.len()
    }
}

/// One CNF instance under construction plus its solver entry point.
pub struct SatInstance {
    formula: CnfFormula,
    num_vars: usize,
    num_clauses: usize,
    num_assertions: usize,
    /// Lazily allocated literal pinned to false by a unit clause.
    false_lit: Option<Lit>,
    next_bitvec_id: usize,
    /// Dedup for repeated `var = constant` tests on the same variable.
    eq_cache: FxHashMap<(usize, u64), Lit>,
}

impl SatInstance {
    /// Create an empty instance.
    pub fn new() -> Self {
        Self {
            formula: CnfFormula::new(),
            num_vars: 0,
            num_clauses: 0,
            num_assertions: 0,
            false_lit: None,
            next_bitvec_id: 0,
            eq_cache: FxHashMap::default(),
        }
    }

    fn fresh_lit(&mut self) -> Lit {
        let var = Var::from_index(self.num_vars);
        self.num_vars += 1;
        Lit::positive(var)
    }

    fn clause(&mut self, lits: &[Lit]) {
        self.formula.add_clause(lits);
        self.num_clauses += 1;
    }

    /// The constant-false literal.
    pub fn lit_false(&mut self) -> Lit {
        if let Some(lit) = self.false_lit {
            return lit;
        }
        let lit = self.fresh_lit();
        self.clause(&[!lit]);
        self.false_lit = Some(lit);
        lit
    }

    /// The constant-true literal.
    pub fn lit_true(&mut self) -> Lit {
        !self.lit_false()
    }

    fn is_const_false(&self, lit: Lit) -> bool {
        self.false_lit == Some(lit)
    }

    fn is_const_true(&self, lit: Lit) -> bool {
        self.false_lit == Some(!lit)
    }

    /// Conjunction literal with constant folding.
    pub fn and(&mut self, a: Lit, b: Lit) -> Lit {
        if self.is_const_false(a) || self.is_const_false(b) {
            return self.lit_false();
        }
        if self.is_const_true(a) {
            return b;
        }
        if self.is_const_true(b) {
            return a;
        }
        if a == b {
            return a;
        }
        if a == !b {
            return self.lit_false();
        }
        let out = self.fresh_lit();
        self.clause(&[!out, a]);
        self.clause(&[!out, b]);
        self.clause(&[out, !a, !b]);
        out
    }

    /// Disjunction literal.
    pub fn or(&mut self, a: Lit, b: Lit) -> Lit {
        !self.and(!a, !b)
    }

    /// Exclusive-or literal with constant folding.
    pub fn xor(&mut self, a: Lit, b: Lit) -> Lit {
        if a == b {
            return self.lit_false();
        }
        if a == !b {
            return self.lit_true();
        }
        if self.is_const_false(a) {
            return b;
        }
        if self.is_const_true(a) {
            return !b;
        }
        if self.is_const_false(b) {
            return a;
        }
        if self.is_const_true(b) {
            return !a;
        }
        let out = self.fresh_lit();
        self.clause(&[!out, a, b]);
        self.clause(&[!out, !a, !b]);
        self.clause(&[out, !a, b]);
        self.clause(&[out, a, !b]);
        out
    }

    /// Allocate a fresh named bit-vector variable of the given width.
    pub fn bitvec(&mut self, name: impl Into<String>, width: usize) -> BitVec {
        let bits = (0..width).map(|_| self.fresh_lit()).collect();
        let id = self.next_bitvec_id;
        self.next_bitvec_id += 1;
        BitVec {
            id,
            name: name.into(),
            bits,
        }
    }

    /// Literal that holds iff `var` equals the constant `value`.
    pub fn eq_const(&mut self, var: &BitVec, value: u64) -> Lit {
        if var.width() < 64 && value >> var.width() != 0 {
            return self.lit_false();
        }
        if let Some(&lit) = self.eq_cache.get(&(var.id, value)) {
            return lit;
        }
        let mut acc = self.lit_true();
        for (j, &bit) in var.bits.iter().enumerate() {
            let lit = if value >> j & 1 == 1 { bit } else { !bit };
            acc = self.and(acc, lit);
        }
        self.eq_cache.insert((var.id, value), acc);
        acc
    }

    /// Literal that holds iff two equal-width variables agree on every bit.
    pub fn eq(&mut self, a: &BitVec, b: &BitVec) -> Lit {
        let mut acc = self.lit_true();
        for j in 0..a.width().min(b.width()) {
            let diff = self.xor(a.bits[j], b.bits[j]);
            acc = self.and(acc, !diff);
        }
        acc
    }

    /// Literal that holds iff `var` is unsigned-less-than the constant
    /// `bound`.
    pub fn ult_const(&mut self, var: &BitVec, bound: u64) -> Lit {
        if var.width() < 64 && bound >= 1 << var.width() {
            return self.lit_true();
        }
        if bound == 0 {
            return self.lit_false();
        }
        // Borrow chain of `var - bound`; the final borrow is set iff
        // `var < bound`. Constant bound bits collapse each step to a single
        // AND or OR.
        let mut borrow = self.lit_false();
        for (j, &bit) in var.bits.iter().enumerate() {
            borrow = if bound >> j & 1 == 1 {
                self.or(!bit, borrow)
            } else {
                self.and(borrow, !bit)
            };
        }
        borrow
    }

    /// Assert a literal.
    pub fn assert(&mut self, lit: Lit) {
        self.num_assertions += 1;
        self.clause(&[lit]);
    }

    /// Assert `a implies b`.
    pub fn assert_implies(&mut self, a: Lit, b: Lit) {
        self.num_assertions += 1;
        self.clause(&[!a, b]);
    }

    /// Assert `a iff b`.
    pub fn assert_iff(&mut self, a: Lit, b: Lit) {
        self.num_assertions += 1;
        self.clause(&[!a, b]);
        self.clause(&[a, !b]);
    }

    /// Run the SAT core on the accumulated formula.
    pub fn check(&self) -> Verdict {
        let mut solver = Solver::new();
        solver.add_formula(&self.formula);
        match solver.solve() {
            Ok(true) => Verdict::Satisfiable,
            Ok(false) => Verdict::Unsatisfiable,
            Err(err) => {
                debug!("solver terminated without verdict: {err}");
                Verdict::Unknown
            }
        }
    }

    /// Instance statistics by name.
    pub fn statistics(&self) -> BTreeMap<String, f64> {
        let mut stats = BTreeMap::new();
        stats.insert("variables".to_string(), self.num_vars as f64);
        stats.insert("clauses".to_string(), self.num_clauses as f64);
        stats.insert("assertions".to_string(), self.num_assertions as f64);
        stats
    }
}

impl Default for SatInstance {
    fn default() -> Self {
        Self::new()
    }
}
