//! Поиск подстроки для свободного текста: названия фильмов и контакты клиентов.
//!
//! Два независимых алгоритма, которые обязаны давать одинаковый ответ:
//! - `bad_character_search` - сдвиг по последнему вхождению символа (Boyer-Moore, только правило плохого символа);
//! - `prefix_function_search` - префикс-функция (Knuth-Morris-Pratt).
//!
//! Оба работают с байтами, регистр не учитывают. Регистронезависимость
//! достигается приведением обоих операндов к нижнему регистру до поиска.

/// Алгоритм, которым пользуется вызывающий код.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchAlgorithm {
    BadCharacter,
    PrefixFunction,
}

/// Есть ли `pattern` в `text` без учета регистра.
pub fn contains_ignore_case(text: &str, pattern: &str, algorithm: SearchAlgorithm) -> bool {
    let text = text.to_lowercase();
    let pattern = pattern.to_lowercase();
    match algorithm {
        SearchAlgorithm::BadCharacter => bad_character_search(&text, &pattern),
        SearchAlgorithm::PrefixFunction => prefix_function_search(&text, &pattern),
    }
}

/// Последний индекс каждого байта в шаблоне, -1 если байта нет.
fn last_occurrence(pattern: &[u8]) -> [isize; 256] {
    let mut last = [-1isize; 256];
    for (i, &b) in pattern.iter().enumerate() {
        last[b as usize] = i as isize;
    }
    last
}

pub fn bad_character_search(text: &str, pattern: &str) -> bool {
    let text = text.as_bytes();
    let pattern = pattern.as_bytes();
    let (n, m) = (text.len(), pattern.len());
    if m == 0 {
        return true;
    }
    if m > n {
        return false;
    }

    let last = last_occurrence(pattern);
    let mut s = 0usize;
    while s <= n - m {
        // Сравниваем окно справа налево
        let mut j = m as isize - 1;
        while j >= 0 && pattern[j as usize] == text[s + j as usize] {
            j -= 1;
        }
        if j < 0 {
            return true;
        }
        let shift = j - last[text[s + j as usize] as usize];
        s += shift.max(1) as usize;
    }
    false
}

/// `pi[i]` - длина наибольшего собственного префикса `pattern[..=i]`,
/// который одновременно является его суффиксом.
pub fn prefix_function(pattern: &[u8]) -> Vec<usize> {
    let mut pi = vec![0usize; pattern.len()];
    let mut k = 0usize;
    for i in 1..pattern.len() {
        while k > 0 && pattern[i] != pattern[k] {
            k = pi[k - 1];
        }
        if pattern[i] == pattern[k] {
            k += 1;
        }
        pi[i] = k;
    }
    pi
}

pub fn prefix_function_search(text: &str, pattern: &str) -> bool {
    let text = text.as_bytes();
    let pattern = pattern.as_bytes();
    if pattern.is_empty() {
        return true;
    }

    let pi = prefix_function(pattern);
    let mut matched = 0usize;
    for &b in text {
        while matched > 0 && b != pattern[matched] {
            matched = pi[matched - 1];
        }
        if b == pattern[matched] {
            matched += 1;
        }
        if matched == pattern.len() {
            return true;
        }
    }
    false
}
