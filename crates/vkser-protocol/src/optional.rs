use std::ops::{Deref, DerefMut};

use crate::serialiser::Serialiser;

/// Scope in which unresolvable resource references are expected.
///
/// Held for the body of a struct whose handles the capture may have pruned
/// (barriers, descriptor writes). Guards nest: only dropping the outermost
/// one ends the scope. Outside Reading mode the guard does nothing.
pub struct OptionalResources<'s, 'a> {
    ser: &'s mut Serialiser<'a>,
    counted: bool,
}

impl<'s, 'a> OptionalResources<'s, 'a> {
    pub(crate) fn enter(ser: &'s mut Serialiser<'a>) -> Self {
        let counted = ser.is_reading();
        if counted {
            *ser.optional_depth_mut() += 1;
        }
        Self { ser, counted }
    }
}

impl<'a> Deref for OptionalResources<'_, 'a> {
    type Target = Serialiser<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.ser
    }
}

impl<'a> DerefMut for OptionalResources<'_, 'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ser
    }
}

impl Drop for OptionalResources<'_, '_> {
    fn drop(&mut self) {
        if self.counted {
            let depth = self.ser.optional_depth_mut();
            *depth = depth.saturating_sub(1);
        }
    }
}
