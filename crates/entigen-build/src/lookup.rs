use entigen_schema::{LOOKUP_TAG_SUFFIX, prelude::*};
use std::cmp::Reverse;

///
/// LookupTable
/// One per lookup tag. Slot index is the component id; slot capacity is
/// bounded by the candidate component count for the run.
///

#[derive(Clone, Debug, Serialize)]
pub struct LookupTable {
    pub tag: String,
    slots: Vec<Option<ComponentDescriptor>>,
}

impl LookupTable {
    #[must_use]
    pub fn new(tag: impl Into<String>, capacity: usize) -> Self {
        Self {
            tag: tag.into(),
            slots: vec![None; capacity],
        }
    }

    /// Number of occupied slots. Occupied ids form `{0, .., n-1}`.
    #[must_use]
    pub fn total_components(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Occupied slots in id order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &ComponentDescriptor)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|descriptor| (id, descriptor)))
    }

    #[must_use]
    pub fn id_of(&self, short_name: &str) -> Option<usize> {
        self.occupied()
            .find(|(_, descriptor)| descriptor.short_name == short_name)
            .map(|(id, _)| id)
    }

    fn occupy_first_free(&mut self, descriptor: &ComponentDescriptor) {
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(descriptor.clone());
        }
    }

    fn occupy(&mut self, id: usize, descriptor: &ComponentDescriptor) {
        self.slots[id] = Some(descriptor.clone());
    }
}

/// Assign dense, reproducible ids within every lookup table.
///
/// Components spanning several contexts are placed first, all at one shared
/// cursor slot, so they hold the same id in every table they appear in. The
/// single-context components that follow first-fit from slot 0 and backfill
/// the holes the cursor left behind. The multi-context-first ordering is a
/// correctness requirement: without it the holes would become permanent
/// gaps.
///
/// Equal tag counts process in `type_name` order, so two consecutive runs
/// over the same descriptor set produce identical assignments.
#[must_use]
pub fn allocate_lookups(descriptors: &[ComponentDescriptor]) -> Vec<LookupTable> {
    let mut candidates: Vec<&ComponentDescriptor> = descriptors
        .iter()
        .filter(|descriptor| !descriptor.skip_generation)
        .collect();
    let capacity = candidates.len();

    candidates.sort_by(|a, b| a.type_name.cmp(&b.type_name));
    candidates.sort_by_key(|descriptor| Reverse(descriptor.lookup_tags().len()));

    let mut tables: Vec<LookupTable> = Vec::new();
    let mut cursor = 0;

    for descriptor in candidates {
        let tags = descriptor.lookup_tags();
        let multi = tags.len() > 1;

        for tag in &tags {
            let index = match tables.iter().position(|table| table.tag == *tag) {
                Some(index) => index,
                None => {
                    tables.push(LookupTable::new(tag.clone(), capacity));
                    tables.len() - 1
                }
            };

            if multi {
                tables[index].occupy(cursor, descriptor);
            } else {
                tables[index].occupy_first_free(descriptor);
            }
        }

        if multi {
            cursor += 1;
        }
    }

    // the default table is part of the output contract even when empty
    if !tables.iter().any(|table| table.tag == LOOKUP_TAG_SUFFIX) {
        tables.push(LookupTable::new(LOOKUP_TAG_SUFFIX, capacity));
    }

    tables.sort_by(|a, b| a.tag.cmp(&b.tag));

    tables
}

///
/// TESTS
///
