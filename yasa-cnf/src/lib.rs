pub mod cnf;
pub use self::cnf::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        let build = CNF::from_vec_i32(vec![]);
        assert!(build.is_ok());
        let mut cnf = build.unwrap();
        assert!(cnf.add_clause(vec![1, 3, 2]).is_ok());
        assert_eq!(cnf.num_clauses(), 1);
        assert_eq!(cnf.num_vars(), 3);
        assert!(cnf.add_clause(vec![-1, -4, 3]).is_ok());
        assert_eq!(cnf.num_clauses(), 2);
        assert_eq!(cnf.num_vars(), 4);
        let output = cnf.dump_to_string();
        let mut line = output.lines();
        assert_eq!(line.next(), Some("p cnf 4 2"));
        assert_eq!(line.next(), Some("1 3 2 0"));
        assert_eq!(line.next(), Some("-1 -4 3 0"));
    }
    #[test]
    fn test_duplicates_and_tautologies() {
        let mut cnf = CNF::default();
        cnf.add_clause(vec![1, 2]).unwrap();
        cnf.add_clause(vec![2, 1]).unwrap();
        cnf.add_clause(vec![1, -3, 3]).unwrap();
        cnf.add_clause(vec![4, 4, -2]).unwrap();
        assert_eq!(cnf.num_clauses(), 2);
        assert_eq!(cnf.clauses()[1], vec![4, -2]);
        assert!(matches!(cnf.add_clause(vec![]), Err(CnfError::EmptyClause)));
        assert!(matches!(
            cnf.add_clause(vec![1, 0]),
            Err(CnfError::InvalidLiteral(_))
        ));
    }
    #[test]
    fn test_with_vars() {
        let cnf = CNF::with_vars(7);
        assert_eq!(cnf.num_vars(), 7);
        assert_eq!(cnf.num_clauses(), 0);
    }
    #[test]
    fn test_load_car() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../cnfs/car.cnf");
        let cnf = CNF::load(&path).expect("failed to load cnfs/car.cnf");
        assert_eq!(cnf.num_vars(), 8);
        assert_eq!(cnf.num_clauses(), 12);
    }
}
