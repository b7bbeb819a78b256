//! Counters collected during one evaluation.

use std::fmt;

/// Statistics of one `evaluate()` call.
///
/// Every evaluation starts from zero; parallel tasks each fill their own
/// report and are combined with [`merge`](Self::merge).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CouplingReport {
    /// Element pairs that passed the search.
    pub pairs_considered: usize,
    /// Element pairs rejected by the bounding box search.
    pub pairs_rejected_by_search: usize,
    /// Non-empty clip polygons (2D).
    pub clip_polygons: usize,
    /// Integration cells produced by triangulation or cutting.
    pub integration_cells: usize,
    /// Clip polygons triangulated by the center fan after a Delaunay failure.
    pub delaunay_fallbacks: usize,
    /// Pairs skipped because of a non-convex master far from the slave.
    pub distant_nonconvex_skips: usize,
    /// 2D pairs without overlap.
    pub no_overlap_pairs: usize,
    /// 3D pairs integrated over the slave element.
    pub element_based_slave: usize,
    /// 3D pairs integrated over the master element.
    pub element_based_master: usize,
    /// 3D pairs integrated over cut cells.
    pub cut_pairs: usize,
    /// 3D pairs classified as disjoint, or whose cut left no inside cells.
    pub disjoint_pairs: usize,
    /// Lumped D entries of mesh A replaced by one.
    pub projection_substitutions_a: usize,
    /// Lumped D entries of mesh B replaced by one.
    pub projection_substitutions_b: usize,
    /// Gauss points without a containing master element.
    pub unmapped_gauss_points: usize,
    /// Slave nodes without a containing master element.
    pub unmapped_nodes: usize,
}

impl CouplingReport {
    /// Add another report's counters to this one.
    pub fn merge(&mut self, other: &CouplingReport) {
        self.pairs_considered += other.pairs_considered;
        self.pairs_rejected_by_search += other.pairs_rejected_by_search;
        self.clip_polygons += other.clip_polygons;
        self.integration_cells += other.integration_cells;
        self.delaunay_fallbacks += other.delaunay_fallbacks;
        self.distant_nonconvex_skips += other.distant_nonconvex_skips;
        self.no_overlap_pairs += other.no_overlap_pairs;
        self.element_based_slave += other.element_based_slave;
        self.element_based_master += other.element_based_master;
        self.cut_pairs += other.cut_pairs;
        self.disjoint_pairs += other.disjoint_pairs;
        self.projection_substitutions_a += other.projection_substitutions_a;
        self.projection_substitutions_b += other.projection_substitutions_b;
        self.unmapped_gauss_points += other.unmapped_gauss_points;
        self.unmapped_nodes += other.unmapped_nodes;
    }
}

impl fmt::Display for CouplingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Coupling report:")?;
        writeln!(
            f,
            "  pairs: {} considered, {} rejected by search",
            self.pairs_considered, self.pairs_rejected_by_search
        )?;
        writeln!(
            f,
            "  2D: {} polygons, {} no overlap, {} Delaunay fallbacks, {} distant non-convex",
            self.clip_polygons, self.no_overlap_pairs, self.delaunay_fallbacks, self.distant_nonconvex_skips
        )?;
        writeln!(
            f,
            "  3D: {} slave-based, {} master-based, {} cut, {} disjoint",
            self.element_based_slave, self.element_based_master, self.cut_pairs, self.disjoint_pairs
        )?;
        writeln!(f, "  integration cells: {}", self.integration_cells)?;
        write!(
            f,
            "  substitutions: {} (A), {} (B); unmapped: {} points, {} nodes",
            self.projection_substitutions_a,
            self.projection_substitutions_b,
            self.unmapped_gauss_points,
            self.unmapped_nodes
        )
    }
}
