//! Typed n-dimensional arrays of observation channels.
use ndarray::ArrayD;
use num_traits::cast::AsPrimitive;
use serde::{Deserialize, Serialize};

/// An observation channel.
///
/// The element type follows the dtype the game uses for the channel, e.g.,
/// `i16` for glyphs and `u8` for characters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Array {
    /// `u8` array.
    U8Array(ArrayD<u8>),
    /// `i16` array.
    I16Array(ArrayD<i16>),
    /// `i32` array.
    I32Array(ArrayD<i32>),
    /// `i64` array.
    I64Array(ArrayD<i64>),
    /// `f32` array.
    F32Array(ArrayD<f32>),
}

impl Array {
    /// Returns the shape of the array.
    pub fn shape(&self) -> &[usize] {
        match self {
            Array::U8Array(a) => a.shape(),
            Array::I16Array(a) => a.shape(),
            Array::I32Array(a) => a.shape(),
            Array::I64Array(a) => a.shape(),
            Array::F32Array(a) => a.shape(),
        }
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.shape().iter().product()
    }

    /// Returns the elements in logical order, cast to `T`.
    pub fn to_flat_vec<T>(&self) -> Vec<T>
    where
        T: Copy + 'static,
        u8: AsPrimitive<T>,
        i16: AsPrimitive<T>,
        i32: AsPrimitive<T>,
        i64: AsPrimitive<T>,
        f32: AsPrimitive<T>,
    {
        match self {
            Array::U8Array(a) => a.iter().map(|x| x.as_()).collect(),
            Array::I16Array(a) => a.iter().map(|x| x.as_()).collect(),
            Array::I32Array(a) => a.iter().map(|x| x.as_()).collect(),
            Array::I64Array(a) => a.iter().map(|x| x.as_()).collect(),
            Array::F32Array(a) => a.iter().map(|x| x.as_()).collect(),
        }
    }
}

macro_rules! impl_from_arrayd {
    ($t:ty, $variant:ident) => {
        impl From<ArrayD<$t>> for Array {
            fn from(a: ArrayD<$t>) -> Self {
                Array::$variant(a)
            }
        }
    };
}

impl_from_arrayd!(u8, U8Array);
impl_from_arrayd!(i16, I16Array);
impl_from_arrayd!(i32, I32Array);
impl_from_arrayd!(i64, I64Array);
impl_from_arrayd!(f32, F32Array);

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::IxDyn;

    #[test]
    fn test_to_flat_vec() {
        let a: Array = ArrayD::from_shape_vec(IxDyn(&[2, 2]), vec![1i16, -2, 3, 4])
            .unwrap()
            .into();
        assert_eq!(a.shape(), &[2, 2]);
        assert_eq!(a.len(), 4);
        assert_eq!(a.to_flat_vec::<f32>(), vec![1.0, -2.0, 3.0, 4.0]);
    }
}
