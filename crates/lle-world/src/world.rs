//! The world state machine.
//!
//! A `World` owns the grid, the laser sources and their beams, the gems and
//! the agents.  Observation and reward components borrow it read-only for
//! the duration of a call; only the environment adapter owns one.
//!
//! # Step resolution order
//!
//! 1. Compute each agent's proposed destination (arrived agents ignore
//!    their action).
//! 2. Validate: terminal world, locally illegal moves, swap conflicts,
//!    vertex conflicts.  Any failure aborts the whole step with the world
//!    untouched.
//! 3. Move all agents simultaneously.
//! 4. Tile effects in ascending agent id: gem pickup, exit entry, void
//!    death.
//! 5. Recompute beams; live non-arrived agents on a lit beam of a foreign
//!    colour die, in ascending agent id.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use lle_core::{Action, AgentId, LaserId, Position, Tile, WorldRng};
use lle_parse::{ParseError, ParseResult, StartSet, WorldConfig, level_str, parse_str};

use crate::agent::{Agent, Gem};
use crate::error::{InvalidAction, InvalidWorldState, WorldError, WorldResult};
use crate::event::WorldEvent;
use crate::grid::Grid;
use crate::laser::{Beam, LaserSource};
use crate::state::WorldState;

/// Joint draws attempted before random starts fall back to a greedy
/// first-free assignment.
const MAX_JOINT_DRAWS: usize = 1000;

#[derive(Debug)]
pub struct World {
    grid: Grid,
    sources: Vec<LaserSource>,
    beams: Vec<Beam>,
    gems: Vec<Gem>,
    agents: Vec<Agent>,
    positions: Vec<Position>,
    start_sets: Vec<StartSet>,
    /// Lit beam overlays, keyed by cell.  Cleared and repopulated on every
    /// beam recomputation; several beams may cross one cell.
    lit_overlay: FxHashMap<Position, Vec<LaserId>>,
    rng: WorldRng,
    seed: u64,
    source_text: String,
}

impl World {
    // ── Construction ──────────────────────────────────────────────────────

    /// Build a world from a parsed configuration.
    ///
    /// Rejects configurations where a declared start cell lies on an
    /// always-on beam of a foreign colour (evaluated with no agents on the
    /// grid, so blocking is not assumed).
    pub fn new(config: WorldConfig) -> ParseResult<World> {
        let grid = Grid::from_config(&config);
        let sources: Vec<LaserSource> = config.sources.iter().map(LaserSource::from_config).collect();
        let beams: Vec<Beam> = sources.iter().map(|s| Beam::trace(&grid, s)).collect();

        for (agent, starts) in config.start_sets.iter().enumerate() {
            for &pos in starts.positions() {
                for (source, beam) in sources.iter().zip(&beams) {
                    if source.is_enabled()
                        && source.colour().index() != agent
                        && beam.path().contains(&pos)
                    {
                        return Err(ParseError::LethalStartPosition {
                            agent,
                            pos,
                            laser: source.laser_id(),
                            colour: source.colour(),
                        });
                    }
                }
            }
        }

        let n_agents = config.n_agents();
        let mut world = World {
            grid,
            sources,
            beams,
            gems: config.gems.iter().map(|&pos| Gem::new(pos)).collect(),
            agents: (0..n_agents as u32).map(|a| Agent::new(AgentId(a))).collect(),
            positions: vec![Position::new(0, 0); n_agents],
            start_sets: config.start_sets,
            lit_overlay: FxHashMap::default(),
            rng: WorldRng::new(0),
            seed: 0,
            source_text: config.source,
        };
        world.reset();
        Ok(world)
    }

    /// Parse a map (plain-string or TOML, dispatched on content) and build
    /// the world.
    pub fn from_str(map: &str) -> ParseResult<World> {
        World::new(parse_str(map)?)
    }

    /// Load a map file from disk.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> ParseResult<World> {
        World::new(lle_parse::parse_file(path)?)
    }

    /// Build one of the shipped level presets (1-based).
    pub fn level(n: usize) -> ParseResult<World> {
        World::from_str(level_str(n)?)
    }

    // ── Dimensions and static topology ────────────────────────────────────

    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Checked tile lookup.
    pub fn at(&self, pos: Position) -> WorldResult<Tile> {
        self.grid.get(pos).ok_or(WorldError::OutOfBounds {
            pos,
            height: self.height(),
            width: self.width(),
        })
    }

    pub fn exit_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.grid.exit_positions()
    }

    pub fn wall_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.grid.wall_positions()
    }

    pub fn void_positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.grid.void_positions()
    }

    /// Per-agent start sets, indexed by agent id.
    pub fn start_sets(&self) -> &[StartSet] {
        &self.start_sets
    }

    /// The original map text this world was parsed from.
    pub fn world_string(&self) -> &str {
        &self.source_text
    }

    // ── Agents and gems ───────────────────────────────────────────────────

    #[inline]
    pub fn n_agents(&self) -> usize {
        self.agents.len()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agents_positions(&self) -> &[Position] {
        &self.positions
    }

    #[inline]
    pub fn n_gems(&self) -> usize {
        self.gems.len()
    }

    pub fn gems(&self) -> &[Gem] {
        &self.gems
    }

    /// Number of gems collected so far this episode.
    pub fn gems_collected(&self) -> usize {
        self.gems.iter().filter(|g| g.is_collected()).count()
    }

    pub fn gem_at(&self, pos: Position) -> Option<&Gem> {
        self.gems.iter().find(|g| g.pos() == pos)
    }

    /// Number of agents frozen on their exit.
    pub fn n_arrived(&self) -> usize {
        self.agents.iter().filter(|a| a.has_arrived()).count()
    }

    /// At least one agent died, or everyone arrived.
    pub fn is_terminal(&self) -> bool {
        self.agents.iter().any(Agent::is_dead) || self.agents.iter().all(Agent::has_arrived)
    }

    // ── Lasers ────────────────────────────────────────────────────────────

    pub fn sources(&self) -> &[LaserSource] {
        &self.sources
    }

    pub fn source_at(&self, pos: Position) -> Option<&LaserSource> {
        self.sources.iter().find(|s| s.pos() == pos)
    }

    pub fn beams(&self) -> &[Beam] {
        &self.beams
    }

    /// The static path of one source's beam, nearest-to-source first.
    pub fn beam_path(&self, laser_id: LaserId) -> &[Position] {
        self.beams[laser_id.index()].path()
    }

    /// Currently lit cells with the source owning each overlay.
    pub fn lit_cells(&self) -> impl Iterator<Item = (Position, &LaserSource)> + '_ {
        self.lit_overlay.iter().flat_map(move |(&pos, lasers)| {
            lasers
                .iter()
                .map(move |laser| (pos, &self.sources[laser.index()]))
        })
    }

    /// `true` if some lit beam of a colour other than `agent` covers `pos`.
    pub fn is_lethal_for(&self, pos: Position, agent: AgentId) -> bool {
        self.lit_overlay.get(&pos).is_some_and(|lasers| {
            lasers
                .iter()
                .any(|laser| self.sources[laser.index()].colour() != agent)
        })
    }

    /// Recolour a source.  Blocking is colour-sensitive, so beams are
    /// recomputed.
    pub fn set_source_colour(&mut self, laser_id: LaserId, colour: AgentId) {
        self.sources[laser_id.index()].set_colour(colour);
        self.recompute_beams();
    }

    /// Enable or disable a source.  A disabled source emits nothing but
    /// stays opaque to other beams.
    pub fn set_source_enabled(&mut self, laser_id: LaserId, enabled: bool) {
        self.sources[laser_id.index()].set_enabled(enabled);
        self.recompute_beams();
    }

    // ── Reset and seeding ─────────────────────────────────────────────────

    /// Reseed the world RNG.  Only random start selection draws from it.
    pub fn seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = WorldRng::new(seed);
        debug!(seed, "world reseeded");
    }

    /// The seed last passed to [`seed`][World::seed] (0 initially).
    pub fn current_seed(&self) -> u64 {
        self.seed
    }

    /// Restore the initial state: agents on (possibly sampled) starts,
    /// alive and not arrived, gems uncollected, beams recomputed.
    pub fn reset(&mut self) -> WorldState {
        for gem in &mut self.gems {
            gem.set_collected(false);
        }
        for agent in &mut self.agents {
            *agent = Agent::new(agent.id());
        }
        self.sample_start_positions();
        self.recompute_beams();
        debug!(n_agents = self.n_agents(), "world reset");
        self.get_state()
    }

    /// Draw one start per agent.  Worlds where every start set is a
    /// singleton never touch the RNG, so mixing fixed- and random-start
    /// maps in one process keeps traces reproducible.
    fn sample_start_positions(&mut self) {
        if self.start_sets.iter().all(|s| s.len() == 1) {
            for (a, set) in self.start_sets.iter().enumerate() {
                self.positions[a] = set.positions()[0];
            }
            return;
        }

        // Joint rejection sampling: each agent draws uniformly from its own
        // set; a draw with any shared cell is discarded wholesale.
        'joint: for _ in 0..MAX_JOINT_DRAWS {
            let mut draw = Vec::with_capacity(self.start_sets.len());
            for set in &self.start_sets {
                let candidates = set.positions();
                draw.push(candidates[self.rng.gen_range(0..candidates.len())]);
            }
            for i in 1..draw.len() {
                if draw[..i].contains(&draw[i]) {
                    continue 'joint;
                }
            }
            self.positions = draw;
            return;
        }

        // Heavily overlapping sets: fall back to the first free candidate
        // per agent, ascending id.
        let mut taken: Vec<Position> = Vec::with_capacity(self.start_sets.len());
        for (a, set) in self.start_sets.iter().enumerate() {
            let pos = set
                .positions()
                .iter()
                .copied()
                .find(|p| !taken.contains(p))
                .unwrap_or(set.positions()[0]);
            taken.push(pos);
            self.positions[a] = pos;
        }
    }

    // ── Stepping ──────────────────────────────────────────────────────────

    /// Which actions each agent could legally take on its own: the target
    /// cell is in bounds, walkable, and not the current cell of another
    /// live, non-arrived agent.  Vertex and swap conflicts between two
    /// movers are only detected at step time.
    pub fn available_actions(&self) -> Vec<Vec<Action>> {
        (0..self.n_agents())
            .map(|a| {
                let agent = &self.agents[a];
                if agent.is_dead() || agent.has_arrived() {
                    return vec![Action::Stay];
                }
                Action::ALL
                    .into_iter()
                    .filter(|&action| {
                        if action == Action::Stay {
                            return true;
                        }
                        match self.positions[a].checked_shift(action.delta()) {
                            Some(target) => {
                                self.grid.is_walkable(target) && !self.is_occupied(target, a)
                            }
                            None => false,
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// `true` if a live, non-arrived agent other than `except` stands on `pos`.
    fn is_occupied(&self, pos: Position, except: usize) -> bool {
        self.agents.iter().zip(&self.positions).any(|(agent, &p)| {
            agent.id().index() != except && agent.is_alive() && !agent.has_arrived() && p == pos
        })
    }

    /// Apply one joint action atomically and return the emitted events.
    ///
    /// Any validation failure leaves the world unchanged.
    pub fn step(&mut self, actions: &[Action]) -> WorldResult<Vec<WorldEvent>> {
        let n = self.n_agents();
        if actions.len() != n {
            return Err(InvalidAction::WrongNumberOfActions {
                expected: n,
                got: actions.len(),
            }
            .into());
        }
        if self.is_terminal() {
            return Err(InvalidAction::WorldIsDone.into());
        }

        // ── Proposed destinations ─────────────────────────────────────────
        let mut dests = self.positions.clone();
        for (a, &action) in actions.iter().enumerate() {
            if self.agents[a].has_arrived() || action == Action::Stay {
                continue;
            }
            let from = self.positions[a];
            let target = from
                .checked_shift(action.delta())
                .filter(|&t| self.grid.is_walkable(t))
                .ok_or(InvalidAction::Unavailable {
                    agent: AgentId(a as u32),
                    action,
                    pos: from,
                })?;
            dests[a] = target;
        }

        // ── Edge (swap) conflicts ─────────────────────────────────────────
        for a in 0..n {
            for b in (a + 1)..n {
                if dests[a] != self.positions[a]
                    && dests[a] == self.positions[b]
                    && dests[b] == self.positions[a]
                {
                    return Err(InvalidAction::SwapConflict {
                        a: AgentId(a as u32),
                        b: AgentId(b as u32),
                    }
                    .into());
                }
            }
        }

        // ── Vertex conflicts ──────────────────────────────────────────────
        //
        // Arrived agents are frozen on their exit and excluded: a live
        // agent may finish on an exit another agent already occupies.
        // Pairs where neither agent changed position cannot conflict.
        for a in 0..n {
            for b in (a + 1)..n {
                if self.agents[a].has_arrived() || self.agents[b].has_arrived() {
                    continue;
                }
                if dests[a] == dests[b]
                    && (dests[a] != self.positions[a] || dests[b] != self.positions[b])
                {
                    return Err(InvalidAction::VertexConflict {
                        a: AgentId(a as u32),
                        b: AgentId(b as u32),
                        pos: dests[a],
                    }
                    .into());
                }
            }
        }

        // ── Simultaneous move, then tile effects in ascending id ──────────
        self.positions = dests;
        let mut events = Vec::new();
        for a in 0..n {
            if self.agents[a].is_dead() || self.agents[a].has_arrived() {
                continue;
            }
            let agent = AgentId(a as u32);
            let pos = self.positions[a];
            match self.grid.at(pos) {
                Tile::Gem => {
                    let gem = self
                        .gems
                        .iter_mut()
                        .find(|g| g.pos() == pos)
                        .filter(|g| !g.is_collected());
                    if let Some(gem) = gem {
                        gem.collect();
                        events.push(WorldEvent::GemCollected { agent, pos });
                    }
                }
                Tile::Exit => {
                    self.agents[a].arrive();
                    events.push(WorldEvent::AgentExited { agent });
                }
                Tile::Void => {
                    self.agents[a].die();
                    events.push(WorldEvent::AgentDied { agent });
                }
                _ => {}
            }
        }

        // ── Beam recomputation and laser deaths ───────────────────────────
        self.recompute_beams();
        for a in 0..n {
            if self.agents[a].is_alive()
                && !self.agents[a].has_arrived()
                && self.is_lethal_for(self.positions[a], AgentId(a as u32))
            {
                self.agents[a].die();
                events.push(WorldEvent::AgentDied {
                    agent: AgentId(a as u32),
                });
            }
        }

        trace!(?events, "step resolved");
        Ok(events)
    }

    // ── State get/set ─────────────────────────────────────────────────────

    pub fn get_state(&self) -> WorldState {
        WorldState::with_alive(
            self.positions.clone(),
            self.gems.iter().map(Gem::is_collected).collect(),
            self.agents.iter().map(Agent::is_alive).collect(),
        )
    }

    /// Force the world into `state`, recompute beams, and return the events
    /// the new state implies: `AgentExited` for every arrived agent and
    /// `GemCollected` for gems force-collected under a live agent.
    ///
    /// Rejected (world untouched) when lengths mismatch, a position is out
    /// of bounds or non-walkable, two live agents share a non-exit cell, or
    /// a live non-arrived agent would stand on a lit foreign beam.
    pub fn set_state(&mut self, state: &WorldState) -> WorldResult<Vec<WorldEvent>> {
        let n = self.n_agents();
        self.validate_state_shape(state)?;

        // ── Apply, remembering enough to roll back ────────────────────────
        let saved_positions = std::mem::replace(&mut self.positions, state.agents_positions.clone());
        let saved_agents = self.agents.clone();
        let saved_gems = self.gems.clone();

        for (gem, &collected) in self.gems.iter_mut().zip(&state.gems_collected) {
            gem.set_collected(collected);
        }
        for a in 0..n {
            let alive = state.agents_alive[a];
            self.agents[a].set_alive(alive);
            let arrived = alive && self.grid.at(self.positions[a]) == Tile::Exit;
            self.agents[a].set_arrived(arrived);
        }
        self.recompute_beams();

        // ── Lethality check (arrived agents are immune) ───────────────────
        for a in 0..n {
            if self.agents[a].is_alive()
                && !self.agents[a].has_arrived()
                && self.is_lethal_for(self.positions[a], AgentId(a as u32))
            {
                let pos = self.positions[a];
                self.positions = saved_positions;
                self.agents = saved_agents;
                self.gems = saved_gems;
                self.recompute_beams();
                return Err(InvalidWorldState::LethalPlacement {
                    agent: AgentId(a as u32),
                    pos,
                }
                .into());
            }
        }

        // ── Implied events, ascending agent id ────────────────────────────
        let mut events = Vec::new();
        for a in 0..n {
            let agent = AgentId(a as u32);
            if self.agents[a].is_dead() {
                continue;
            }
            let pos = self.positions[a];
            if self.grid.at(pos) == Tile::Gem {
                let gem = self
                    .gems
                    .iter_mut()
                    .find(|g| g.pos() == pos)
                    .filter(|g| !g.is_collected());
                if let Some(gem) = gem {
                    gem.collect();
                    events.push(WorldEvent::GemCollected { agent, pos });
                }
            }
            if self.agents[a].has_arrived() {
                events.push(WorldEvent::AgentExited { agent });
            }
        }
        Ok(events)
    }

    fn validate_state_shape(&self, state: &WorldState) -> WorldResult<()> {
        let check = |what, expected, got| {
            if expected != got {
                Err(InvalidWorldState::WrongLength {
                    what,
                    expected,
                    got,
                })
            } else {
                Ok(())
            }
        };
        check("agent positions", self.n_agents(), state.agents_positions.len())?;
        check("gem flags", self.n_gems(), state.gems_collected.len())?;
        check("alive flags", self.n_agents(), state.agents_alive.len())?;

        for (a, &pos) in state.agents_positions.iter().enumerate() {
            let agent = AgentId(a as u32);
            if !self.grid.in_bounds(pos) {
                return Err(InvalidWorldState::OutOfBounds { agent, pos }.into());
            }
            if !self.grid.at(pos).is_walkable() {
                return Err(InvalidWorldState::NotWalkable { agent, pos }.into());
            }
        }

        // Two live agents may only share a cell if it is an exit (both are
        // then frozen there); dead agents are off the board.
        for a in 0..state.agents_positions.len() {
            for b in (a + 1)..state.agents_positions.len() {
                if state.agents_alive[a]
                    && state.agents_alive[b]
                    && state.agents_positions[a] == state.agents_positions[b]
                    && self.grid.at(state.agents_positions[a]) != Tile::Exit
                {
                    return Err(InvalidWorldState::Overlap {
                        a: AgentId(a as u32),
                        b: AgentId(b as u32),
                        pos: state.agents_positions[a],
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    // ── Beam recomputation ────────────────────────────────────────────────

    /// Recompute every beam's lit mask from the current agent placement and
    /// rebuild the lit-cell overlay.  O(sources × max(H, W)).
    fn recompute_beams(&mut self) {
        let sources = &self.sources;
        let agents = &self.agents;
        let positions = &self.positions;

        for beam in &mut self.beams {
            let source = &sources[beam.laser_id().index()];
            let colour = source.colour();
            beam.relight(source.is_enabled(), |cell| {
                agents
                    .iter()
                    .zip(positions)
                    .any(|(agent, &pos)| agent.is_alive() && agent.id() == colour && pos == cell)
            });
        }

        let overlay = &mut self.lit_overlay;
        overlay.clear();
        for beam in &self.beams {
            for cell in beam.lit_cells() {
                overlay.entry(cell).or_default().push(beam.laser_id());
            }
        }
    }
}

// ── Equality, display, serialisation ──────────────────────────────────────────

impl PartialEq for World {
    /// Structural: same map, same seed, same dynamic state, same per-source
    /// colour and enabled flag.
    fn eq(&self, other: &Self) -> bool {
        self.source_text == other.source_text
            && self.seed == other.seed
            && self.get_state() == other.get_state()
            && self.sources.len() == other.sources.len()
            && self
                .sources
                .iter()
                .zip(&other.sources)
                .all(|(a, b)| a.colour() == b.colour() && a.is_enabled() == b.is_enabled())
    }
}

impl std::fmt::Display for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source_text)
    }
}

/// What actually persists: the map text, the seed, the dynamic state and
/// per-source mutable flags — never the cached beam overlays.
#[derive(serde::Serialize, serde::Deserialize)]
struct SavedWorld {
    map: String,
    seed: u64,
    state: WorldState,
    colours: Vec<AgentId>,
    enabled: Vec<bool>,
}

impl serde::Serialize for World {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SavedWorld {
            map: self.source_text.clone(),
            seed: self.seed,
            state: self.get_state(),
            colours: self.sources.iter().map(LaserSource::colour).collect(),
            enabled: self.sources.iter().map(LaserSource::is_enabled).collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for World {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        let saved = SavedWorld::deserialize(deserializer)?;
        let mut world = World::from_str(&saved.map).map_err(D::Error::custom)?;
        world.seed(saved.seed);
        if saved.colours.len() != world.sources.len() || saved.enabled.len() != world.sources.len()
        {
            return Err(D::Error::custom("laser flag count does not match the map"));
        }
        for (k, (&colour, &enabled)) in saved.colours.iter().zip(&saved.enabled).enumerate() {
            world.sources[k].set_colour(colour);
            world.sources[k].set_enabled(enabled);
        }
        world.set_state(&saved.state).map_err(D::Error::custom)?;
        Ok(world)
    }
}
