//! Scanning: turning switch contacts into one raw bit per key.

use core::convert::Infallible;

use embedded_hal::digital::v2::{InputPin, OutputPin};

/// Raw per-key samples packed into 32-bit words. Bit `i` set means key `i` is closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyBits {
    words: Vec<u32>,
    len: usize,
}

impl KeyBits {
    /// All keys open.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(32)],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Out of range keys read as open.
    pub fn get(&self, i: usize) -> bool {
        i < self.len && self.words[i / 32] & (1 << (i % 32)) != 0
    }

    /// Out of range keys are ignored.
    pub fn set(&mut self, i: usize, closed: bool) {
        if i >= self.len {
            return;
        }
        let mask = 1 << (i % 32);
        if closed {
            self.words[i / 32] |= mask;
        } else {
            self.words[i / 32] &= !mask;
        }
    }

    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.get(i))
    }
}

impl FromIterator<bool> for KeyBits {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let closed: Vec<bool> = iter.into_iter().collect();
        let mut bits = KeyBits::new(closed.len());
        for (i, c) in closed.into_iter().enumerate() {
            bits.set(i, c);
        }
        bits
    }
}

/// Produces the raw sample of every key, once per tick.
///
/// How the bits are obtained is up to the implementation; [`Matrix`] multiplexes rows and
/// columns, [`DirectPins`] reads one pin per key, [`StaticReader`] is set from software.
pub trait KeyReader {
    type Error;

    /// Number of keys, fixed for the lifetime of the reader.
    fn key_count(&self) -> usize;

    fn read(&mut self) -> Result<KeyBits, Self::Error>;
}

/// A row/column matrix of switches.
///
/// Generic parameters are in order: the type of column pins, the type of row pins, the
/// number of columns and rows. Keys are numbered row-major: key `row * CS + col`.
pub struct Matrix<C, R, const CS: usize, const RS: usize>
where
    C: InputPin,
    R: OutputPin,
{
    cols: [C; CS],
    rows: [R; RS],
}

impl<C, R, const CS: usize, const RS: usize> Matrix<C, R, CS, RS>
where
    C: InputPin,
    R: OutputPin,
{
    /// Creates a new Matrix.
    ///
    /// Assumes columns are pull-up inputs,
    /// and rows are output pins which are set high when not being scanned.
    pub fn new<E>(cols: [C; CS], rows: [R; RS]) -> Result<Self, E>
    where
        C: InputPin<Error = E>,
        R: OutputPin<Error = E>,
    {
        let mut res = Self { cols, rows };
        res.clear()?;
        Ok(res)
    }

    fn clear<E>(&mut self) -> Result<(), E>
    where
        C: InputPin<Error = E>,
        R: OutputPin<Error = E>,
    {
        for r in self.rows.iter_mut() {
            r.set_high()?;
        }
        Ok(())
    }
}

impl<C, R, E, const CS: usize, const RS: usize> KeyReader for Matrix<C, R, CS, RS>
where
    C: InputPin<Error = E>,
    R: OutputPin<Error = E>,
{
    type Error = E;

    fn key_count(&self) -> usize {
        CS * RS
    }

    /// Every row pin in order is pulled low, and then each column
    /// pin is tested; if it's low, the key is marked as pressed.
    fn read(&mut self) -> Result<KeyBits, E> {
        let mut keys = KeyBits::new(CS * RS);
        for (ri, row) in self.rows.iter_mut().enumerate() {
            row.set_low()?;
            for (ci, col) in self.cols.iter().enumerate() {
                if col.is_low()? {
                    keys.set(ri * CS + ci, true);
                }
            }
            row.set_high()?;
        }
        Ok(keys)
    }
}

/// Switches wired straight to pull-up inputs, one pin per key ("diodeless").
///
/// A `None` pin is a key position with no switch behind it; it always reads open.
pub struct DirectPins<P, const N: usize>
where
    P: InputPin,
{
    pins: [Option<P>; N],
}

impl<P, const N: usize> DirectPins<P, N>
where
    P: InputPin,
{
    pub fn new(pins: [Option<P>; N]) -> Self {
        Self { pins }
    }
}

impl<P, E, const N: usize> KeyReader for DirectPins<P, N>
where
    P: InputPin<Error = E>,
{
    type Error = E;

    fn key_count(&self) -> usize {
        N
    }

    fn read(&mut self) -> Result<KeyBits, E> {
        let mut keys = KeyBits::new(N);
        for (i, pin) in self.pins.iter().enumerate() {
            if let Some(pin) = pin {
                keys.set(i, pin.is_low()?);
            }
        }
        Ok(keys)
    }
}

/// An in-memory reader whose keys are closed and opened from software.
#[derive(Debug, Clone)]
pub struct StaticReader {
    keys: KeyBits,
}

impl StaticReader {
    pub fn new(key_count: usize) -> Self {
        Self {
            keys: KeyBits::new(key_count),
        }
    }

    pub fn press(&mut self, i: usize) {
        self.keys.set(i, true);
    }

    pub fn release(&mut self, i: usize) {
        self.keys.set(i, false);
    }

    pub fn set(&mut self, i: usize, closed: bool) {
        self.keys.set(i, closed);
    }

    pub fn is_closed(&self, i: usize) -> bool {
        self.keys.get(i)
    }
}

impl KeyReader for StaticReader {
    type Error = Infallible;

    fn key_count(&self) -> usize {
        self.keys.len()
    }

    fn read(&mut self) -> Result<KeyBits, Infallible> {
        Ok(self.keys.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Shared wiring of a 3 column by 2 row test board.
    #[derive(Default)]
    struct Board {
        driven_row: Cell<Option<usize>>,
        closed: Cell<[[bool; 3]; 2]>,
    }

    impl Board {
        fn close(&self, row: usize, col: usize) {
            let mut closed = self.closed.get();
            closed[row][col] = true;
            self.closed.set(closed);
        }
    }

    struct RowPin<'a> {
        board: &'a Board,
        row: usize,
    }

    impl OutputPin for RowPin<'_> {
        type Error = Infallible;

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.board.driven_row.set(Some(self.row));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            if self.board.driven_row.get() == Some(self.row) {
                self.board.driven_row.set(None);
            }
            Ok(())
        }
    }

    struct ColPin<'a> {
        board: &'a Board,
        col: usize,
    }

    impl InputPin for ColPin<'_> {
        type Error = Infallible;

        fn is_high(&self) -> Result<bool, Infallible> {
            self.is_low().map(|low| !low)
        }

        fn is_low(&self) -> Result<bool, Infallible> {
            Ok(match self.board.driven_row.get() {
                Some(row) => self.board.closed.get()[row][self.col],
                None => false,
            })
        }
    }

    struct Level<'a>(&'a Cell<bool>);

    impl InputPin for Level<'_> {
        type Error = Infallible;

        fn is_high(&self) -> Result<bool, Infallible> {
            Ok(self.0.get())
        }

        fn is_low(&self) -> Result<bool, Infallible> {
            Ok(!self.0.get())
        }
    }

    struct Broken;

    impl InputPin for Broken {
        type Error = &'static str;

        fn is_high(&self) -> Result<bool, &'static str> {
            Err("pin unreadable")
        }

        fn is_low(&self) -> Result<bool, &'static str> {
            Err("pin unreadable")
        }
    }

    #[test]
    fn key_bits_span_words() {
        let mut bits = KeyBits::new(40);
        assert_eq!(bits.words().len(), 2);
        bits.set(0, true);
        bits.set(33, true);
        bits.set(40, true);
        assert!(bits.get(0));
        assert!(bits.get(33));
        assert!(!bits.get(40));
        assert_eq!(bits.words(), &[1, 2]);
        bits.set(0, false);
        assert_eq!(bits.iter().filter(|&b| b).count(), 1);
        bits.clear();
        assert_eq!(bits, KeyBits::new(40));
        let collected: KeyBits = [true, false, true].into_iter().collect();
        assert_eq!(collected.words(), &[0b101]);
        assert_eq!(collected.len(), 3);
    }

    #[test]
    fn matrix_numbers_keys_row_major() {
        let board = Board::default();
        let mut matrix = Matrix::new(
            [0, 1, 2].map(|col| ColPin { board: &board, col }),
            [0, 1].map(|row| RowPin { board: &board, row }),
        )
        .unwrap();
        assert_eq!(matrix.key_count(), 6);
        assert!(matrix.read().unwrap().iter().all(|b| !b));

        board.close(0, 1);
        board.close(1, 2);
        let keys = matrix.read().unwrap();
        let closed: Vec<usize> = (0..6).filter(|&i| keys.get(i)).collect();
        assert_eq!(closed, vec![1, 5]);
        assert_eq!(board.driven_row.get(), None, "rows are released after a scan");
    }

    #[test]
    fn direct_pins_are_active_low() {
        let levels = [Cell::new(true), Cell::new(false), Cell::new(true)];
        let mut pins = DirectPins::new([
            Some(Level(&levels[0])),
            Some(Level(&levels[1])),
            None,
            Some(Level(&levels[2])),
        ]);
        assert_eq!(pins.key_count(), 4);
        let keys: Vec<bool> = pins.read().unwrap().iter().collect();
        assert_eq!(keys, vec![false, true, false, false]);
        levels[2].set(false);
        assert!(pins.read().unwrap().get(3));
    }

    #[test]
    fn pin_errors_propagate() {
        let mut pins = DirectPins::new([None, Some(Broken)]);
        assert_eq!(pins.read(), Err("pin unreadable"));
    }

    #[test]
    fn static_reader() {
        let mut reader = StaticReader::new(3);
        reader.press(2);
        reader.set(0, true);
        reader.release(0);
        reader.press(7);
        assert!(reader.is_closed(2));
        let keys: Vec<bool> = reader.read().unwrap().iter().collect();
        assert_eq!(keys, vec![false, false, true]);
    }
}
