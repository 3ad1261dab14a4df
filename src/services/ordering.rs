//! Быстрая сортировка (разбиение Хоара) по массиву индексов.
//!
//! Сами записи не перемещаются: переставляются только индексы, а порядок
//! задает внешний компаратор над парой индексов записей. Так один сортировщик
//! обслуживает любое число порядков без дублирования логики разбиения.

use std::cmp::Ordering;

/// Сортирует `indices` на месте по компаратору `compare(a, b)`.
pub fn sort_indices<F>(indices: &mut [usize], mut compare: F)
where
    F: FnMut(usize, usize) -> Ordering,
{
    quick_sort(indices, &mut compare);
}

/// Отсортированная перестановка `0..len`.
pub fn sorted_indices<F>(len: usize, compare: F) -> Vec<usize>
where
    F: FnMut(usize, usize) -> Ordering,
{
    let mut indices: Vec<usize> = (0..len).collect();
    sort_indices(&mut indices, compare);
    indices
}

fn quick_sort<F>(indices: &mut [usize], compare: &mut F)
where
    F: FnMut(usize, usize) -> Ordering,
{
    if indices.len() <= 1 {
        return;
    }
    let p = partition(indices, compare);
    let (left, right) = indices.split_at_mut(p);
    quick_sort(left, compare);
    quick_sort(&mut right[1..], compare);
}

/// Опорный элемент - крайний левый. После разбиения он стоит на позиции `j`:
/// слева не больше него, справа не меньше.
fn partition<F>(a: &mut [usize], compare: &mut F) -> usize
where
    F: FnMut(usize, usize) -> Ordering,
{
    let n = a.len();
    let pivot = a[0];
    let mut i = 0;
    let mut j = n;
    loop {
        i += 1;
        while i < n && compare(a[i], pivot) == Ordering::Less {
            i += 1;
        }
        j -= 1;
        while j > 0 && compare(a[j], pivot) == Ordering::Greater {
            j -= 1;
        }
        if i >= j {
            break;
        }
        a.swap(i, j);
    }
    a.swap(0, j);
    j
}
