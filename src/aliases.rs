/// Station display-name aliases.
///
/// NRCS publishes SNOTEL sites under their historical names, which often
/// don't match what skiers call the area (e.g. "Atwater" is the Alta
/// site). This table maps the published name to the name shown to users.
/// Entries are matched exactly and case-sensitively.

// ---------------------------------------------------------------------------
// Built-in table
// ---------------------------------------------------------------------------

/// A single `published name -> display name` mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias {
    pub original: &'static str,
    pub display: &'static str,
}

const fn alias(original: &'static str, display: &'static str) -> Alias {
    Alias { original, display }
}

/// Compiled-in aliases, grouped by region. Order is significant: when a name
/// appears twice, the later entry wins.
pub static STATION_ALIASES: &[Alias] = &[
    // Wasatch (slc)
    alias("Atwater", "Alta"),
    alias("Farmington Lower", "Farmington Canyon"),
    alias("Farmington", "Bountiful Peak"),
    alias("Parrish Creek", "Parrish Creek"),
    alias("Louis Meadow", "City Creek Canyon"),
    alias("Parleys Upper", "Lambs Canyon"),
    alias("Thaynes Canyon", "Park City - Thaynes Canyon"),
    alias("Timpanogos Divide", "Sundance"),
    alias("Dry Fork", "Oquirrh Mountains"),
    alias("Santaquin Meadows", "Mt Nebo - North"),
    alias("Payson RS", "Payson CG"),
    alias("Clear Creek #2", "Soldier Summit"),
    alias("Lightning Ridge", "Causey"),
    // Cascades (seattle)
    alias("Fish Lake", "Alpine Lakes Wilderness - East"),
    alias("Cougar Mountain", "Green River - North"),
    alias("Grouse Camp", "Mission Ridge"),
    alias("Trough", "Mission Ridge - East"),
    alias("Skookum Creek", "Tolt River South"),
    alias("Alpine Meadows", "Tolt River North"),
    alias("Decline Creek", "Darrington Mountains"),
    alias("Lynn Lake", "Green River - South"),
    alias("Ollalie Meadows", "Alpental Mid Mountain"),
    alias("Rex River", "Cedar River"),
    alias("Meadows Pass", "Cedar River - Upper"),
    alias("Sawmill Ridge", "Green River - Upper"),
];

// ---------------------------------------------------------------------------
// Lookup service
// ---------------------------------------------------------------------------

/// Read-only alias lookup. Cheap to copy; holds a borrowed table.
#[derive(Debug, Clone, Copy)]
pub struct AliasTable {
    entries: &'static [Alias],
}

impl AliasTable {
    /// The compiled-in table.
    pub fn builtin() -> Self {
        AliasTable {
            entries: STATION_ALIASES,
        }
    }

    /// A table over caller-supplied entries.
    pub fn from_entries(entries: &'static [Alias]) -> Self {
        AliasTable { entries }
    }

    /// Returns the display name for `raw_name`, or `raw_name` itself when no
    /// entry matches. Every entry is checked so the last match wins.
    pub fn resolve<'a>(&self, raw_name: &'a str) -> &'a str {
        self.entries
            .iter()
            .filter(|a| a.original == raw_name)
            .last()
            .map(|a| a.display)
            .unwrap_or(raw_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        AliasTable::builtin()
    }
}

/// Resolves `raw_name` against the compiled-in table.
pub fn resolve_alias(raw_name: &str) -> &str {
    AliasTable::builtin().resolve(raw_name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
