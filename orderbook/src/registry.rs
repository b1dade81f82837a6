//! A registry of order books, one per asset pair, the way the teacher's
//! `Orderbook` type multiplexes state across trading pairs above a single
//! event stream.

use std::collections::HashMap;

use model::asset::AssetPair;

use crate::book::OrderBook;

#[derive(Default)]
pub struct OrderBooks {
    books: HashMap<AssetPair, OrderBook>,
}

impl OrderBooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create(&mut self, pair: AssetPair) -> &mut OrderBook {
        self.books.entry(pair).or_default()
    }

    pub fn get(&self, pair: &AssetPair) -> Option<&OrderBook> {
        self.books.get(pair)
    }

    pub fn get_mut(&mut self, pair: &AssetPair) -> Option<&mut OrderBook> {
        self.books.get_mut(pair)
    }

    pub fn pairs(&self) -> impl Iterator<Item = &AssetPair> {
        self.books.keys()
    }
}
