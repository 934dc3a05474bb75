//! Macros for code generation in the ICL tree types.
//!
//! Every tree node owns ordered collections of children; these macros stamp
//! out the add/get accessor pair for each of them.

/// Generate add/get accessor methods for a child collection.
///
/// This macro is designed to be used inside impl blocks and generates two methods:
/// - `<add_method>()` - appends a child to the collection
/// - `<get_method>()` - borrows the collection as a slice
///
/// Works with any collection that has `push` and derefs to a slice, so both
/// `Vec` and `SmallVec` fields are accepted.
///
/// # Example
///
/// ```ignore
/// pub struct Bundle {
///     checks: Vec<CheckDetail>,
/// }
///
/// impl Bundle {
///     define_child_accessors!(checks, add_check_detail, checks, CheckDetail);
/// }
/// ```
#[macro_export]
macro_rules! define_child_accessors {
    ($field_name:ident, $add_method:ident, $get_method:ident, $child:ty) => {
        /// Append a child to this collection.
        pub fn $add_method(&mut self, child: $child) {
            self.$field_name.push(child);
        }

        /// Borrow every child in this collection, in order.
        #[must_use]
        pub fn $get_method(&self) -> &[$child] {
            &self.$field_name
        }
    };
}

#[cfg(test)]
mod tests {
    use smallvec::SmallVec;

    #[derive(Default)]
    struct TestNode {
        items: Vec<u32>,
        notes: SmallVec<[String; 2]>,
    }

    impl TestNode {
        define_child_accessors!(items, add_item, items, u32);
        define_child_accessors!(notes, add_note, notes, String);
    }

    #[test]
    fn test_define_child_accessors_macro() {
        let mut node = TestNode::default();
        node.add_item(7);
        node.add_item(9);
        assert_eq!(node.items(), &[7, 9]);
    }

    #[test]
    fn test_accessors_over_smallvec() {
        let mut node = TestNode::default();
        for note in ["a", "b", "c"] {
            node.add_note(note.to_string());
        }
        assert_eq!(node.notes().len(), 3);
        assert_eq!(node.notes()[2], "c");
    }
}
