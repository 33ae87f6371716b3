use crate::error::{GadgetError, Result};
use crate::field::{Bool, Field};

/// A circuit value that flattens to a fixed number of native fields.
///
/// Generic gadgets (`select`, `equal`, `array_get_generic`) work field by
/// field through this view.
pub trait Provable: Clone {
    const SIZE: usize;

    fn to_fields(&self) -> Vec<Field>;

    /// Rebuilds a value from exactly [`Self::SIZE`] fields.
    fn from_fields(fields: &[Field]) -> Result<Self>;

    fn is_constant(&self) -> bool {
        self.to_fields().iter().all(Field::is_constant)
    }
}

pub(crate) fn check_len(fields: &[Field], expected: usize) -> Result<()> {
    if fields.len() != expected {
        return Err(GadgetError::LengthMismatch {
            expected,
            actual: fields.len(),
        });
    }
    Ok(())
}

impl Provable for Field {
    const SIZE: usize = 1;

    fn to_fields(&self) -> Vec<Field> {
        vec![self.clone()]
    }

    fn from_fields(fields: &[Field]) -> Result<Self> {
        check_len(fields, Self::SIZE)?;
        Ok(fields[0].clone())
    }
}

impl Provable for Bool {
    const SIZE: usize = 1;

    fn to_fields(&self) -> Vec<Field> {
        vec![self.field().clone()]
    }

    /// The field is trusted to be boolean already.
    fn from_fields(fields: &[Field]) -> Result<Self> {
        check_len(fields, Self::SIZE)?;
        Ok(Bool::from_field_unchecked(fields[0].clone()))
    }
}
