//! Built-in sample programs
//!
//! A small gallery shown by `--list-samples` and cycled in the playground.
//! Every sample compiles and runs without diagnostics.

/// A titled sample program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub title: &'static str,
    pub description: &'static str,
    pub source: &'static str,
}

pub const SAMPLES: &[Sample] = &[
    Sample {
        title: "Basic Structure",
        description: "Every program opens with arambha systummm and closes with bihari_sramik.",
        source: "arambha systummm

// statements go here

bihari_sramik
",
    },
    Sample {
        title: "Variables",
        description: "ghoshit_kar declares a variable, nishchit_kar a constant.",
        source: "arambha systummm

ghoshit_kar umra = 20;
nishchit_kar naam = \"Ayush\";
umra = umra + 1;
prakashit_kar(naam, umra);

bihari_sramik
",
    },
    Sample {
        title: "Comments",
        description: "Line comments start with //, block comments sit between /* and */.",
        source: "arambha systummm

// a line comment

/*
  a block comment
  spanning lines
*/

bihari_sramik
",
    },
    Sample {
        title: "Print Statement",
        description: "prakashit_kar prints its arguments separated by spaces.",
        source: "arambha systummm

prakashit_kar(\"Namaste Duniya!\");
ghoshit_kar naam = \"Ayush\";
prakashit_kar(\"Naam:\", naam);

bihari_sramik
",
    },
    Sample {
        title: "Data Types",
        description: "Numbers, strings, satya/asatya booleans and chintan (null).",
        source: "arambha systummm

ghoshit_kar sankhya = 10;
ghoshit_kar dashamlav = 2.5;
ghoshit_kar naam = \"Bihari Dev\";
ghoshit_kar satyaHai = satya;
ghoshit_kar kuchNahi = chintan;

prakashit_kar(naam);
prakashit_kar(sankhya + dashamlav);
prakashit_kar(satyaHai, kuchNahi);

bihari_sramik
",
    },
    Sample {
        title: "If-Else",
        description: "yadi, anyatha_yadi and anyatha pick exactly one branch.",
        source: "arambha systummm

ghoshit_kar aayu = 18;

yadi (aayu > 60) {
  prakashit_kar(\"Senior\");
} anyatha_yadi (aayu >= 18) {
  prakashit_kar(\"Aap vote de sakte hain\");
} anyatha {
  prakashit_kar(\"Abhi nahi\");
}

bihari_sramik
",
    },
    Sample {
        title: "For Loop",
        description: "prati_ghatak takes an initializer, a condition and an increment.",
        source: "arambha systummm

prati_ghatak (ghoshit_kar i = 0; i < 5; i = i + 1) {
  prakashit_kar(\"Sankhya: \" + i);
}

bihari_sramik
",
    },
    Sample {
        title: "While Loop + Control",
        description: "yatha loops while its condition holds; viram breaks, agla_ghaatak skips ahead.",
        source: "arambha systummm

ghoshit_kar i = 0;

yatha (i < 10) {
  i = i + 1;

  yadi (i == 3) {
    agla_ghaatak;
  }

  yadi (i == 8) {
    viram;
  }

  prakashit_kar(i);
}

bihari_sramik
",
    },
    Sample {
        title: "Operators",
        description: "Arithmetic, comparison and the word operators ca, va and na.",
        source: "arambha systummm

ghoshit_kar a = 10;
ghoshit_kar b = 20;

prakashit_kar(a + b, b - a, a * b, b / a, b % 3);
prakashit_kar(a == b, a != b, a < b);
prakashit_kar(satya ca asatya, satya va asatya, na satya);

bihari_sramik
",
    },
    Sample {
        title: "Tour",
        description: "Declarations, an if chain, both loop forms and loop control together.",
        source: "arambha systummm

ghoshit_kar a = 10;
a = 20;
nishchit_kar b = 20;

yadi (a > b) {
  prakashit_kar(\"a is greater than b\");
} anyatha_yadi (a == b) {
  prakashit_kar(\"a is equal to b\");
} anyatha {
  prakashit_kar(\"a is less than b\");
}

prati_ghatak (ghoshit_kar i = 0; i < 5; i++) {
  prakashit_kar(\"Loop count:\", i);
  yadi (i == 2) {
    viram;
  }
}

a = 12;
yatha (a < b) {
  a = a + 1;
  yadi (a == 15) {
    agla_ghaatak;
  }
  yadi (a >= 18) {
    viram;
  }
  prakashit_kar(\"Inside while loop, a =\", a);
}

prakashit_kar(\"Final value of a:\", a);

bihari_sramik
",
    },
];

/// Look up a sample by its 1-based position in [`SAMPLES`].
pub fn by_number(number: usize) -> Option<&'static Sample> {
    number.checked_sub(1).and_then(|i| SAMPLES.get(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{compile, run};

    #[test]
    fn test_every_sample_compiles_and_runs_cleanly() {
        for sample in SAMPLES {
            assert!(compile(sample.source).is_ok(), "{} failed to compile", sample.title);
            let log = run(sample.source);
            assert!(
                !log.lines().any(|l| l.starts_with("Error:") || l.starts_with("Execution Error:")),
                "{} produced a fault:\n{}",
                sample.title,
                log
            );
        }
    }

    #[test]
    fn test_sample_outputs() {
        assert_eq!(run(SAMPLES[0].source), "");
        assert_eq!(run(SAMPLES[1].source), "Ayush 21");
        assert_eq!(run(SAMPLES[4].source), "Bihari Dev\n12.5\ntrue null");
        assert_eq!(run(SAMPLES[5].source), "Aap vote de sakte hain");
        assert_eq!(
            run(SAMPLES[6].source),
            "Sankhya: 0\nSankhya: 1\nSankhya: 2\nSankhya: 3\nSankhya: 4"
        );
        assert_eq!(run(SAMPLES[7].source), "1\n2\n4\n5\n6\n7");
        assert_eq!(
            run(SAMPLES[8].source),
            "30 10 200 2 2\nfalse true true\nfalse true false"
        );
    }

    #[test]
    fn test_tour_output() {
        let expected = "\
a is equal to b
Loop count: 0
Loop count: 1
Loop count: 2
Inside while loop, a = 13
Inside while loop, a = 14
Inside while loop, a = 16
Inside while loop, a = 17
Final value of a: 18";
        assert_eq!(run(SAMPLES[9].source), expected);
    }

    #[test]
    fn test_by_number() {
        assert_eq!(by_number(1).map(|s| s.title), Some("Basic Structure"));
        assert!(by_number(0).is_none());
        assert!(by_number(SAMPLES.len() + 1).is_none());
    }
}
