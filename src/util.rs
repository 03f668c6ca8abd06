pub mod nibble_pair;
