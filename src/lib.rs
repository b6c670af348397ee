#[macro_use]
extern crate error_chain;

pub mod analysis;
pub mod ast;
pub mod environment;
pub mod loader;
pub mod parser;
pub mod simplify;
pub mod util;

pub mod error {
    error_chain! {
        types {
            Error, ErrorKind, ResultExt, Result;
        }

        foreign_links {
            IOError(::std::io::Error);
            SerdeYAML(::serde_yaml::Error);
        }

        errors {
            Inapplicable {
                description("no simplifiable boolean expression")
                display("No enclosing boolean expression can be simplified")
            }
            Inconsistent(m: String) {
                description("simplifiability predicate and rewrite disagree")
                display("Internal consistency failure: {}", m)
            }
            Parse(m: String) {
                description("expression could not be parsed")
                display("Parse error: {}", m)
            }
        }
    }
}
