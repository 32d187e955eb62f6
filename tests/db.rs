mod common;

#[test]
fn test_creates_and_removes_db_files() {
    let dir_path;

    {
        let test_db = common::TestDb::new();
        dir_path = test_db.dir_path();
        assert!(dir_path.join("test.db").exists());

        let conn = test_db.pool().get();
        assert!(conn.is_ok());
    }

    assert!(!dir_path.exists());
}
