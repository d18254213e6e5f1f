//! Operator sugar for building filter trees.
//!
//! `&a & &b` intersects, `|` unions, `-` subtracts, `^` takes the symmetric
//! difference and `!` inverts. Each operator creates a new combinator node
//! over the given operands.

use crate::filter::Filter;
use alloc::vec;
use core::ops::{BitAnd, BitOr, BitXor, Not, Sub};

macro_rules! binary_filter_op {
    ($trait:ident, $method:ident, $ctor:ident) => {
        impl $trait<&Filter> for &Filter {
            type Output = Filter;

            fn $method(self, rhs: &Filter) -> Filter {
                Filter::$ctor(vec![self.clone(), rhs.clone()])
            }
        }

        impl $trait for Filter {
            type Output = Filter;

            fn $method(self, rhs: Filter) -> Filter {
                Filter::$ctor(vec![self, rhs])
            }
        }
    };
}

binary_filter_op!(BitAnd, bitand, intersection);
binary_filter_op!(BitOr, bitor, union);
binary_filter_op!(Sub, sub, difference);
binary_filter_op!(BitXor, bitxor, symmetric_difference);

impl Not for &Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        Filter::inversion(self.clone())
    }
}

impl Not for Filter {
    type Output = Filter;

    fn not(self) -> Filter {
        Filter::inversion(self)
    }
}
