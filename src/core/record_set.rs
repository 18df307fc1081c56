use indexmap::IndexMap;

use crate::core::types::{CarId, CarRecord};
use crate::error::{PlotError, PlotResult};

/// Ordered record collection with an id index built once per load.
///
/// The index and the sequence always describe the same records: every id
/// resolves to exactly one position and vice versa.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<CarRecord>,
    index: IndexMap<CarId, usize>,
}

impl RecordSet {
    pub fn new(records: Vec<CarRecord>) -> PlotResult<Self> {
        let mut index = IndexMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if index.insert(record.id, position).is_some() {
                return Err(PlotError::DuplicateRecordId(record.id));
            }
        }
        Ok(Self { records, index })
    }

    #[must_use]
    pub fn records(&self) -> &[CarRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: CarId) -> bool {
        self.index.contains_key(&id)
    }

    /// Looks up one record by id.
    ///
    /// A missing id is a caller contract violation and fails loudly; UI code
    /// holding ids across a reload should check [`RecordSet::contains`] or
    /// use [`RecordSet::find`] instead.
    pub fn record(&self, id: CarId) -> PlotResult<&CarRecord> {
        self.find(id).ok_or(PlotError::UnknownRecordId(id))
    }

    #[must_use]
    pub fn find(&self, id: CarId) -> Option<&CarRecord> {
        self.index.get(&id).map(|&position| &self.records[position])
    }
}
