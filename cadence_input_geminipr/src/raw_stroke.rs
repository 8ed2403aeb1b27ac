//! Parses a raw 6-byte GeminiPR packet into the set of steno key symbols it
//! represents. Canonicalization — ordering, number-bar substitution,
//! hyphenation — is left entirely to `cadence_core::Chord`; this module's
//! only job is identifying which of the 24 key slots a packet holds.

#[derive(Debug, Default, PartialEq)]
pub struct RawStroke {
    keys: Vec<String>,
}

impl RawStroke {
    pub fn into_keys(self) -> Vec<String> {
        self.keys
    }

    fn push(&mut self, symbol: &str) {
        self.keys.push(symbol.to_string());
    }

    /// Parses a raw byte packet into the set of steno key symbols it holds.
    ///
    /// # Panics
    ///
    /// Panics if `raw` does not have length 6, the fixed GeminiPR packet
    /// size.
    #[rustfmt::skip]
    pub fn parse_raw(raw: &[u8]) -> Self {
        assert_eq!(raw.len(), 6);
        fn msb_pos(byte: u8) -> bool {
            byte > 127
        }

        let mut stroke = RawStroke::default();
        let mut bytes = raw.iter();

        // first row: number keys 1-6
        if let Some(row) = bytes.next() {
            let mut row = row << 1; // discard the always-set leading bit
            row = row << 1; // discard the unused "Fn" key
            for _ in 0..6 {
                if msb_pos(row) { stroke.push("#"); }
                row = row << 1;
            }
        }

        // second row: left hand, S- through H-
        if let Some(row) = bytes.next() {
            let mut row = row << 1;
            if msb_pos(row) { stroke.push("S-"); } row = row << 1;
            if msb_pos(row) { stroke.push("S-"); } row = row << 1;
            if msb_pos(row) { stroke.push("T-"); } row = row << 1;
            if msb_pos(row) { stroke.push("K-"); } row = row << 1;
            if msb_pos(row) { stroke.push("P-"); } row = row << 1;
            if msb_pos(row) { stroke.push("W-"); } row = row << 1;
            if msb_pos(row) { stroke.push("H-"); }
        }

        // third row: R, A, O, two star keys, two unused keys
        if let Some(row) = bytes.next() {
            let mut row = row << 1;
            if msb_pos(row) { stroke.push("R-"); } row = row << 1;
            if msb_pos(row) { stroke.push("A-"); } row = row << 1;
            if msb_pos(row) { stroke.push("O-"); } row = row << 1;
            if msb_pos(row) { stroke.push("*"); } row = row << 1;
            if msb_pos(row) { stroke.push("*"); }
        }

        // fourth row: unused power key, two more star keys, E, U, F, R
        if let Some(row) = bytes.next() {
            let mut row = row << 1;
            row = row << 1; // unused power key
            if msb_pos(row) { stroke.push("*"); } row = row << 1;
            if msb_pos(row) { stroke.push("*"); } row = row << 1;
            if msb_pos(row) { stroke.push("-E"); } row = row << 1;
            if msb_pos(row) { stroke.push("-U"); } row = row << 1;
            if msb_pos(row) { stroke.push("-F"); } row = row << 1;
            if msb_pos(row) { stroke.push("-R"); }
        }

        // fifth row: P, B, L, G, T, S, D
        if let Some(row) = bytes.next() {
            let mut row = row << 1;
            if msb_pos(row) { stroke.push("-P"); } row = row << 1;
            if msb_pos(row) { stroke.push("-B"); } row = row << 1;
            if msb_pos(row) { stroke.push("-L"); } row = row << 1;
            if msb_pos(row) { stroke.push("-G"); } row = row << 1;
            if msb_pos(row) { stroke.push("-T"); } row = row << 1;
            if msb_pos(row) { stroke.push("-S"); } row = row << 1;
            if msb_pos(row) { stroke.push("-D"); }
        }

        // sixth row: number keys 7-9, three unused, -Z
        if let Some(row) = bytes.next() {
            let mut row = row << 1;
            for _ in 0..3 {
                if msb_pos(row) { stroke.push("#"); }
                row = row << 1;
            }
            for _ in 0..3 {
                row = row << 1;
            }
            if msb_pos(row) { stroke.push("-Z"); }
        }

        stroke
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::Chord;

    fn rtfcre(raw: &[u8]) -> String {
        Chord::new(RawStroke::parse_raw(raw).into_keys())
            .unwrap()
            .rtfcre()
            .to_string()
    }

    #[test]
    fn test_basic_stroke_parsing() {
        assert_eq!(rtfcre(&[128, 48, 36, 0, 2, 0]), "STA*S");
        assert_eq!(rtfcre(&[160, 2, 0, 0, 32, 64]), "#W-B");
        assert_eq!(rtfcre(&[128, 21, 0, 0, 0, 0]), "TPH");
        assert_eq!(rtfcre(&[128, 0, 64, 0, 64, 0]), "R-P");
    }

    #[test]
    fn test_number_bar_lets_chord_substitute() {
        assert_eq!(rtfcre(&[128, 1, 0, 2, 0, 64]), "4-6");
        assert_eq!(rtfcre(&[128, 1, 32, 2, 0, 64]), "456");
    }

    #[test]
    fn test_empty_packet_yields_no_keys() {
        assert!(RawStroke::parse_raw(&[0, 0, 0, 0, 0, 0]).into_keys().is_empty());
    }

    #[test]
    #[should_panic]
    fn test_wrong_length_panics() {
        RawStroke::parse_raw(&[0, 0, 0]);
    }
}
