//! Каталог фильмов: бинарное дерево поиска по названию.
//!
//! Каждое поддерево принадлежит ровно одному родителю (`Option<Box<Node>>`),
//! поэтому удаление реализовано рекурсивным спуском, который возвращает
//! (возможно новый) корень поддерева.

use std::cmp::Ordering;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Movie, MovieId};
use crate::search::{contains_ignore_case, SearchAlgorithm};

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    movie: Movie,
    left: Link,
    right: Link,
}

impl Node {
    fn leaf(movie: Movie) -> Box<Self> {
        Box::new(Node { movie, left: None, right: None })
    }
}

#[derive(Debug, Default)]
pub struct CatalogIndex {
    root: Link,
    len: usize,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Вставка по названию. Если узел с таким названием уже есть,
    /// его запись заменяется целиком. Возвращает `true`, если узел новый.
    pub fn insert(&mut self, movie: Movie) -> bool {
        let inserted = Self::insert_into(&mut self.root, movie);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    fn insert_into(link: &mut Link, movie: Movie) -> bool {
        match link {
            None => {
                *link = Some(Node::leaf(movie));
                true
            }
            Some(node) => match movie.title.as_str().cmp(node.movie.title.as_str()) {
                Ordering::Less => Self::insert_into(&mut node.left, movie),
                Ordering::Greater => Self::insert_into(&mut node.right, movie),
                Ordering::Equal => {
                    debug!("Replacing catalog entry '{}'", movie.title);
                    node.movie = movie;
                    false
                }
            },
        }
    }

    /// Точный поиск спуском по дереву.
    pub fn find(&self, title: &str) -> EngineResult<&Movie> {
        let mut cursor = &self.root;
        while let Some(node) = cursor {
            cursor = match title.cmp(node.movie.title.as_str()) {
                Ordering::Less => &node.left,
                Ordering::Greater => &node.right,
                Ordering::Equal => return Ok(&node.movie),
            };
        }
        Err(EngineError::not_found(format!("movie '{}'", title)))
    }

    /// Поиск по id - полный обход, id не является ключом дерева.
    pub fn find_by_id(&self, id: MovieId) -> Option<&Movie> {
        self.enumerate().into_iter().find(|m| m.id == id)
    }

    pub fn delete(&mut self, title: &str) -> EngineResult<Movie> {
        let mut removed = None;
        self.root = Self::delete_from(self.root.take(), title, &mut removed);
        match removed {
            Some(movie) => {
                self.len -= 1;
                Ok(movie)
            }
            None => Err(EngineError::not_found(format!("movie '{}'", title))),
        }
    }

    fn delete_from(link: Link, title: &str, removed: &mut Option<Movie>) -> Link {
        let mut node = link?;
        match title.cmp(node.movie.title.as_str()) {
            Ordering::Less => {
                node.left = Self::delete_from(node.left.take(), title, removed);
                Some(node)
            }
            Ordering::Greater => {
                node.right = Self::delete_from(node.right.take(), title, removed);
                Some(node)
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, None) => {
                    *removed = Some(node.movie);
                    None
                }
                (Some(child), None) | (None, Some(child)) => {
                    *removed = Some(node.movie);
                    Some(child)
                }
                (Some(left), Some(right)) => {
                    // Два потомка: поднимаем преемника (минимум правого поддерева)
                    let (successor, rest) = Self::take_min(right);
                    *removed = Some(std::mem::replace(&mut node.movie, successor));
                    node.left = Some(left);
                    node.right = rest;
                    Some(node)
                }
            },
        }
    }

    /// Отрезает минимальный узел поддерева, возвращает его запись и остаток.
    fn take_min(mut node: Box<Node>) -> (Movie, Link) {
        match node.left.take() {
            None => {
                let Node { movie, right, .. } = *node;
                (movie, right)
            }
            Some(left) => {
                let (min, rest) = Self::take_min(left);
                node.left = rest;
                (min, Some(node))
            }
        }
    }

    /// Симметричный обход: названия в неубывающем порядке.
    pub fn enumerate(&self) -> Vec<&Movie> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<&Node> = Vec::new();
        let mut cursor = self.root.as_deref();
        loop {
            while let Some(node) = cursor {
                stack.push(node);
                cursor = node.left.as_deref();
            }
            match stack.pop() {
                Some(node) => {
                    out.push(&node.movie);
                    cursor = node.right.as_deref();
                }
                None => break,
            }
        }
        out
    }

    pub fn titles(&self) -> Vec<String> {
        self.enumerate().into_iter().map(|m| m.title.clone()).collect()
    }

    /// Все фильмы, в названии которых встречается `pattern` (без учета регистра).
    pub fn search_by_pattern(&self, pattern: &str) -> Vec<&Movie> {
        self.enumerate()
            .into_iter()
            .filter(|m| contains_ignore_case(&m.title, pattern, SearchAlgorithm::BadCharacter))
            .collect()
    }
}
