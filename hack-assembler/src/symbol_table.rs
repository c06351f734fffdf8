//! Resolves Hack assembly symbols to RAM/ROM addresses.
//!
//! The predefined symbols (virtual registers, special pointers, I/O memory
//! map) never change, so they live in a `phf::Map` built at compile time.
//! Everything the program itself declares — labels and variables — goes in
//! a plain `HashMap` filled in as the two passes run.

use phf::phf_map;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// First RAM address available to a user-declared variable. Addresses
/// below this are reserved for the virtual registers and special pointers.
pub const USER_RAM_BASE: u16 = 16;

static PREDEFINED_SYMBOLS: phf::Map<&'static str, u16> = phf_map! {
    "R0" => 0, "R1" => 1, "R2" => 2, "R3" => 3, "R4" => 4, "R5" => 5,
    "R6" => 6, "R7" => 7, "R8" => 8, "R9" => 9, "R10" => 10, "R11" => 11,
    "R12" => 12, "R13" => 13, "R14" => 14, "R15" => 15,
    "SP" => 0, "LCL" => 1, "ARG" => 2, "THIS" => 3, "THAT" => 4,
    "SCREEN" => 16384, "KBD" => 24576,
};

/// Maps symbolic labels and variables to numeric addresses.
///
/// Predefined symbols resolve through [`PREDEFINED_SYMBOLS`] and can never
/// be shadowed; everything else lives in a per-table `HashMap` that grows
/// as the two-pass assembler encounters new labels and variables.
///
/// ```
/// use hack_assembler::SymbolTable;
///
/// let mut symbols = SymbolTable::new();
/// assert_eq!(symbols.get_address("SCREEN"), 16384);
///
/// symbols.add_entry("LOOP", 100);
/// assert_eq!(symbols.get_address("LOOP"), 100);
/// ```
#[derive(Debug, Default)]
pub struct SymbolTable {
    user_symbols: HashMap<String, u16>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            user_symbols: HashMap::with_capacity(32),
        }
    }

    /// Records a label or variable at a known address, called during
    /// pass 1 once a `(LABEL)` line's ROM address is known.
    pub fn add_entry(&mut self, symbol: &str, address: u16) {
        self.user_symbols.insert(symbol.to_string(), address);
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        predefined_address(symbol).is_some() || self.user_symbols.contains_key(symbol)
    }

    /// Looks up a symbol's address, defaulting to `0` if it has never been
    /// declared. A-instructions that reference a genuinely new symbol go
    /// through [`Self::get_or_insert`] instead, which allocates one.
    #[must_use]
    pub fn get_address(&self, symbol: &str) -> u16 {
        predefined_address(symbol).unwrap_or_else(|| self.user_symbols.get(symbol).copied().unwrap_or(0))
    }

    /// Resolves a symbol during pass 2, allocating the next free RAM word
    /// for it on first sight. Predefined symbols are returned as-is and
    /// never consume a RAM word.
    pub fn get_or_insert(&mut self, symbol: &str, next_address: &mut u16) -> u16 {
        if let Some(addr) = predefined_address(symbol) {
            return addr;
        }

        match self.user_symbols.entry(symbol.to_string()) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                let addr = *next_address;
                *next_address += 1;
                *e.insert(addr)
            }
        }
    }
}

fn predefined_address(symbol: &str) -> Option<u16> {
    PREDEFINED_SYMBOLS.get(symbol).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_pointers_alias_the_first_five_virtual_registers() {
        let symbols = SymbolTable::new();
        for (pointer, register) in [
            ("SP", "R0"),
            ("LCL", "R1"),
            ("ARG", "R2"),
            ("THIS", "R3"),
            ("THAT", "R4"),
        ] {
            assert_eq!(symbols.get_address(pointer), symbols.get_address(register));
        }
    }

    #[test]
    fn io_pointers_sit_outside_the_32k_register_block() {
        let symbols = SymbolTable::new();
        assert_eq!(symbols.get_address("SCREEN"), 16384);
        assert_eq!(symbols.get_address("KBD"), 24576);
    }

    #[test]
    fn unknown_symbol_defaults_to_zero_without_mutating_the_table() {
        let symbols = SymbolTable::new();
        assert_eq!(symbols.get_address("FOO"), 0);
        assert!(!symbols.contains("FOO"));
    }

    #[test]
    fn user_entries_round_trip_through_add_entry() {
        let mut symbols = SymbolTable::new();
        symbols.add_entry("LOOP", 100);
        assert!(symbols.contains("LOOP"));
        assert_eq!(symbols.get_address("LOOP"), 100);
    }

    #[test]
    fn get_or_insert_allocates_once_then_remembers() {
        let mut symbols = SymbolTable::new();
        let mut ram = USER_RAM_BASE;

        assert_eq!(symbols.get_or_insert("i", &mut ram), 16);
        assert_eq!(ram, 17);
        assert_eq!(symbols.get_or_insert("i", &mut ram), 16);
        assert_eq!(ram, 17);
        assert_eq!(symbols.get_or_insert("j", &mut ram), 17);
        assert_eq!(ram, 18);
    }

    #[test]
    fn predefined_symbols_never_consume_a_ram_word() {
        let mut symbols = SymbolTable::new();
        let mut ram = USER_RAM_BASE;
        assert_eq!(symbols.get_or_insert("SP", &mut ram), 0);
        assert_eq!(ram, USER_RAM_BASE);
    }

    #[test]
    fn a_label_declared_with_add_entry_cannot_be_reallocated() {
        let mut symbols = SymbolTable::new();
        symbols.add_entry("LOOP", 5);
        let mut ram = USER_RAM_BASE;
        assert_eq!(symbols.get_or_insert("LOOP", &mut ram), 5);
        assert_eq!(ram, USER_RAM_BASE);
    }
}
