//! Menu partitioning helpers

use longbox_common::model::{Namable, NamableList};

/// Split `namables` into `n` roughly equal columns for menu display.
/// When the list does not divide evenly, the earliest columns take one
/// extra element each.
pub fn columns(namables: &[Namable], n: usize) -> Vec<Vec<Namable>> {
    if n == 0 {
        return Vec::new();
    }
    let base = namables.len() / n;
    let mut remainder = namables.len() % n;
    let mut result = Vec::with_capacity(n);
    let mut start = 0;
    for _ in 0..n {
        let mut end = start + base;
        if remainder > 0 {
            end += 1;
            remainder -= 1;
        }
        result.push(namables[start..end].to_vec());
        start = end;
    }
    result
}

/// Display order for character and creator listings.
pub fn sort_by_name(list: &mut NamableList) {
    list.sort_by(|a, b| a.name.cmp(&b.name));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn namables(count: usize) -> NamableList {
        (1..=count)
            .map(|i| Namable {
                id: format!("{:03}", i),
                name: format!("Entity {}", i),
            })
            .collect()
    }

    #[test]
    fn test_even_split() {
        let cols = columns(&namables(9), 3);
        assert_eq!(cols.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 3, 3]);
    }

    #[test]
    fn test_remainder_goes_to_earliest_columns() {
        let cols = columns(&namables(10), 3);
        assert_eq!(cols.iter().map(Vec::len).collect::<Vec<_>>(), vec![4, 3, 3]);
        // Order is preserved across the columns
        assert_eq!(cols[0][0].id, "001");
        assert_eq!(cols[1][0].id, "005");
        assert_eq!(cols[2][0].id, "008");
    }

    #[test]
    fn test_fewer_elements_than_columns() {
        let cols = columns(&namables(2), 8);
        let lens: Vec<usize> = cols.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![1, 1, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_zero_columns() {
        assert!(columns(&namables(3), 0).is_empty());
    }

    #[test]
    fn test_sort_by_name() {
        let mut list = vec![
            Namable {
                id: "001".to_string(),
                name: "Thor".to_string(),
            },
            Namable {
                id: "002".to_string(),
                name: "Iron Man".to_string(),
            },
        ];
        sort_by_name(&mut list);
        assert_eq!(list[0].name, "Iron Man");
    }
}
