//! The reference circuit: scope graphs, wires, clock and surfaces.

use std::collections::HashSet;

use wiretrace_foundation::{
    BitVector, CellId, Cid, Clock, Delivery, Error, ErrorKind, EventSource, GraphId, Hierarchy,
    Result, SimEvent, Simulation, Subscription, SurfaceId, Tick, WireId,
};

use crate::bus::{EventBus, Topic};

// =============================================================================
// Arena Records
// =============================================================================

#[derive(Clone, Debug)]
struct GraphData {
    /// The subcircuit cell this graph is the body of.
    subcircuit: Option<CellId>,
    /// Client identities in use by wires and cells of this graph.
    cids: HashSet<Cid>,
}

#[derive(Clone, Debug)]
struct CellData {
    cid: Cid,
    graph: GraphId,
    /// Inner graph, if the cell is a subcircuit instance.
    body: Option<GraphId>,
}

#[derive(Clone, Debug)]
struct WireData {
    cid: Cid,
    graph: GraphId,
    signal: BitVector,
}

// =============================================================================
// Circuit
// =============================================================================

/// An in-memory circuit.
///
/// Elements are never freed, so every handle minted by a circuit stays valid
/// for its lifetime. Wires and subcircuits can be moved between graphs.
#[derive(Debug)]
pub struct Circuit {
    tick: Tick,
    graphs: Vec<GraphData>,
    cells: Vec<CellData>,
    wires: Vec<WireData>,
    surfaces: u32,
    next_cid: u64,
    bus: EventBus,
}

impl Circuit {
    /// Creates a circuit with an empty root graph at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tick: 0,
            graphs: vec![GraphData {
                subcircuit: None,
                cids: HashSet::new(),
            }],
            cells: Vec::new(),
            wires: Vec::new(),
            surfaces: 0,
            next_cid: 0,
            bus: EventBus::new(),
        }
    }

    /// Returns the root graph.
    #[must_use]
    pub const fn root(&self) -> GraphId {
        GraphId::new(0)
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Adds a `bits`-wide wire with a generated cid. Its value starts
    /// undefined.
    ///
    /// # Errors
    ///
    /// Returns an error if `graph` is unknown or `bits` is 0.
    pub fn add_wire(&mut self, graph: GraphId, bits: usize) -> Result<WireId> {
        let cid = self.generate_cid(graph)?;
        self.add_named_wire(graph, cid, bits)
    }

    /// Adds a `bits`-wide wire with an explicit cid.
    ///
    /// # Errors
    ///
    /// Returns an error if `graph` is unknown, `bits` is 0, or `cid` is
    /// already used in `graph`.
    pub fn add_named_wire(&mut self, graph: GraphId, cid: Cid, bits: usize) -> Result<WireId> {
        let signal = BitVector::undefined(bits)?;
        self.claim_cid(graph, &cid)?;
        let id = WireId::new(index_u32(self.wires.len()));
        self.wires.push(WireData { cid, graph, signal });
        Ok(id)
    }

    /// Adds a subcircuit instance with a generated cid, returning the cell
    /// and its (empty) body graph.
    ///
    /// # Errors
    ///
    /// Returns an error if `graph` is unknown.
    pub fn add_subcircuit(&mut self, graph: GraphId) -> Result<(CellId, GraphId)> {
        let cid = self.generate_cid(graph)?;
        self.add_named_subcircuit(graph, cid)
    }

    /// Adds a subcircuit instance with an explicit cid.
    ///
    /// # Errors
    ///
    /// Returns an error if `graph` is unknown or `cid` is already used in
    /// `graph`.
    pub fn add_named_subcircuit(&mut self, graph: GraphId, cid: Cid) -> Result<(CellId, GraphId)> {
        self.claim_cid(graph, &cid)?;
        let cell = CellId::new(index_u32(self.cells.len()));
        let body = GraphId::new(index_u32(self.graphs.len()));
        self.graphs.push(GraphData {
            subcircuit: Some(cell),
            cids: HashSet::new(),
        });
        self.cells.push(CellData {
            cid,
            graph,
            body: Some(body),
        });
        Ok((cell, body))
    }

    /// Moves a wire into another graph, keeping its cid.
    ///
    /// # Errors
    ///
    /// Returns an error if a handle is unknown or the cid is taken in the
    /// destination.
    pub fn move_wire(&mut self, wire: WireId, graph: GraphId) -> Result<()> {
        let (cid, from) = {
            let data = self.wire_data(wire)?;
            (data.cid.clone(), data.graph)
        };
        if from == graph {
            return Ok(());
        }
        self.claim_cid(graph, &cid)?;
        self.graphs[from.index()].cids.remove(&cid);
        self.wires[wire.index()].graph = graph;
        tracing::debug!(%wire, %from, to = %graph, "wire moved");
        Ok(())
    }

    /// Moves a subcircuit instance (and everything nested in it) into
    /// another graph.
    ///
    /// # Errors
    ///
    /// Returns an error if a handle is unknown, the cid is taken in the
    /// destination, or the destination is nested inside the subcircuit.
    pub fn move_subcircuit(&mut self, cell: CellId, graph: GraphId) -> Result<()> {
        let (cid, from, body) = {
            let data = self.cell_data(cell)?;
            (data.cid.clone(), data.graph, data.body)
        };
        self.graph_data(graph)?;
        if from == graph {
            return Ok(());
        }
        if let Some(body) = body {
            if self.encloses(body, graph) {
                return Err(Error::new(ErrorKind::ScopeCycle { cell, graph }));
            }
        }
        self.claim_cid(graph, &cid)?;
        self.graphs[from.index()].cids.remove(&cid);
        self.cells[cell.index()].graph = graph;
        tracing::debug!(%cell, %from, to = %graph, "subcircuit moved");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Simulation
    // -------------------------------------------------------------------------

    /// Sets a wire's value.
    ///
    /// Returns `false` without notifying anyone if the value is unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the wire is unknown or the width differs.
    pub fn set_signal(&mut self, wire: WireId, value: BitVector) -> Result<bool> {
        let data = self.wire_data(wire)?;
        if data.signal.width() != value.width() {
            return Err(Error::width_mismatch(data.signal.width(), value.width()));
        }
        if data.signal == value {
            return Ok(false);
        }
        self.wires[wire.index()].signal = value.clone();
        let event = SimEvent::SignalChanged {
            wire,
            tick: self.tick,
            value,
        };
        self.bus.publish(Topic::Signal(wire), &event);
        Ok(true)
    }

    /// Completes the current tick: notifies post-tick subscribers with the
    /// tick just completed, then advances the clock. Returns the new tick.
    pub fn advance(&mut self) -> Tick {
        let completed = self.tick;
        self.tick += 1;
        self.bus
            .publish(Topic::PostTick, &SimEvent::PostTick(completed));
        self.tick
    }

    /// Advances the clock by `ticks` ticks.
    pub fn advance_by(&mut self, ticks: u64) -> Tick {
        for _ in 0..ticks {
            self.advance();
        }
        self.tick
    }

    // -------------------------------------------------------------------------
    // Surfaces
    // -------------------------------------------------------------------------

    /// Attaches a new rendering surface.
    pub fn attach_surface(&mut self) -> SurfaceId {
        let surface = SurfaceId::new(self.surfaces);
        self.surfaces += 1;
        self.bus
            .publish(Topic::SurfaceAttached, &SimEvent::SurfaceAttached(surface));
        tracing::debug!(%surface, "surface attached");
        surface
    }

    /// Raises a tracking toggle for `wire` on `surface`, as the diagram UI
    /// would when the user clicks a link's monitor button.
    ///
    /// # Errors
    ///
    /// Returns an error if either handle is unknown.
    pub fn toggle_track(&mut self, surface: SurfaceId, wire: WireId) -> Result<()> {
        if surface.index() >= self.surfaces as usize {
            return Err(Error::new(ErrorKind::UnknownSurface(surface)));
        }
        self.wire_data(wire)?;
        self.bus.publish(
            Topic::TrackToggled(surface),
            &SimEvent::TrackToggled { surface, wire },
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    /// Returns the number of wires.
    #[must_use]
    pub fn wire_count(&self) -> usize {
        self.wires.len()
    }

    /// Returns the event bus.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn graph_data(&self, graph: GraphId) -> Result<&GraphData> {
        self.graphs
            .get(graph.index())
            .ok_or_else(|| Error::new(ErrorKind::UnknownGraph(graph)))
    }

    fn cell_data(&self, cell: CellId) -> Result<&CellData> {
        self.cells
            .get(cell.index())
            .ok_or_else(|| Error::new(ErrorKind::UnknownCell(cell)))
    }

    fn wire_data(&self, wire: WireId) -> Result<&WireData> {
        self.wires
            .get(wire.index())
            .ok_or_else(|| Error::new(ErrorKind::UnknownWire(wire)))
    }

    fn claim_cid(&mut self, graph: GraphId, cid: &Cid) -> Result<()> {
        self.graph_data(graph)?;
        let cids = &mut self.graphs[graph.index()].cids;
        if !cids.insert(cid.clone()) {
            return Err(Error::duplicate_cid(cid.as_str(), graph));
        }
        Ok(())
    }

    fn generate_cid(&mut self, graph: GraphId) -> Result<Cid> {
        let mut next = self.next_cid;
        let taken = &self.graph_data(graph)?.cids;
        let cid = loop {
            let cid = Cid::generated(next);
            next += 1;
            if !taken.contains(&cid) {
                break cid;
            }
        };
        self.next_cid = next;
        Ok(cid)
    }

    /// Returns true if `inner` is `outer` or nested somewhere inside it.
    fn encloses(&self, outer: GraphId, inner: GraphId) -> bool {
        let mut graph = inner;
        loop {
            if graph == outer {
                return true;
            }
            match self.graphs[graph.index()].subcircuit {
                Some(cell) => graph = self.cells[cell.index()].graph,
                None => return false,
            }
        }
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

fn index_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

// =============================================================================
// Collaborator Traits
// =============================================================================

impl Clock for Circuit {
    fn tick(&self) -> Tick {
        self.tick
    }
}

impl Hierarchy for Circuit {
    fn wire_cid(&self, wire: WireId) -> &Cid {
        &self.wires[wire.index()].cid
    }

    fn wire_graph(&self, wire: WireId) -> GraphId {
        self.wires[wire.index()].graph
    }

    fn graph_subcircuit(&self, graph: GraphId) -> Option<CellId> {
        self.graphs[graph.index()].subcircuit
    }

    fn cell_cid(&self, cell: CellId) -> &Cid {
        &self.cells[cell.index()].cid
    }

    fn cell_graph(&self, cell: CellId) -> GraphId {
        self.cells[cell.index()].graph
    }
}

impl Simulation for Circuit {
    fn signal(&self, wire: WireId) -> &BitVector {
        &self.wires[wire.index()].signal
    }

    fn bits(&self, wire: WireId) -> usize {
        self.wires[wire.index()].signal.width()
    }

    fn watch_signal(&self, wire: WireId) -> Subscription {
        self.bus.subscribe(Topic::Signal(wire))
    }
}

impl EventSource for Circuit {
    fn on_surface_attached(&self) -> Subscription {
        self.bus.subscribe(Topic::SurfaceAttached)
    }

    fn on_track_toggled(&self, surface: SurfaceId) -> Subscription {
        self.bus.subscribe(Topic::TrackToggled(surface))
    }

    fn on_post_tick(&self) -> Subscription {
        self.bus.subscribe(Topic::PostTick)
    }

    fn next_event(&mut self) -> Option<Delivery> {
        self.bus.next()
    }
}
