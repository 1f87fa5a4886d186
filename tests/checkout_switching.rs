use graft::RepoError;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;
use common::{TestRepo, commit_files, commit_files_with, failing_workspace_repo, repo};

#[rstest]
fn checkout_moves_head_and_materializes_the_tip(repo: TestRepo) {
    commit_files(&repo, &[("a.txt", "main")], "initial commit");
    let topic = repo.repository.create_branch("topic", None).unwrap();
    repo.repository.checkout(&topic).unwrap();
    let topic_tip = commit_files(&repo, &[("a.txt", "topic")], "topic work");

    let main = repo.repository.find_branch("main").unwrap();
    let checked_out = repo.repository.checkout(&main).unwrap();

    assert_eq!(repo.repository.head_name().short_name(), "main");
    assert_eq!(checked_out.tip(), main.tip());
    assert_eq!(repo.workspace.materialized(), Some(main.tip().clone()));
    assert_ne!(main.tip(), &topic_tip);
}

#[rstest]
fn checkout_resolves_a_stale_snapshot_to_the_current_tip(repo: TestRepo) {
    commit_files(&repo, &[("a.txt", "1")], "initial commit");
    let stale_main = repo.repository.find_branch("main").unwrap();
    let newer_tip = commit_files(&repo, &[("a.txt", "2")], "second commit");

    let checked_out = repo.repository.checkout(&stale_main).unwrap();

    assert_eq!(checked_out.tip(), &newer_tip);
    assert_eq!(repo.workspace.materialized(), Some(newer_tip));
}

#[rstest]
fn checkout_of_a_deleted_branch_is_an_invalid_argument(repo: TestRepo) {
    commit_files(&repo, &[("a.txt", "1")], "initial commit");
    let topic = repo.repository.create_branch("topic", None).unwrap();
    repo.repository.delete_branch("topic").unwrap();

    let err = repo.repository.checkout(&topic).unwrap_err();

    assert!(matches!(err, RepoError::InvalidArgument(_)));
    assert_eq!(repo.repository.head_name().short_name(), "main");
}

#[rstest]
fn checkout_by_name_resolves_the_branch_first(repo: TestRepo) {
    commit_files(&repo, &[("a.txt", "1")], "initial commit");
    repo.repository.create_branch("topic", None).unwrap();

    let checked_out = repo.repository.checkout_branch("topic").unwrap();

    assert_eq!(checked_out.short_name(), "topic");
    assert_eq!(repo.repository.head_name().short_name(), "topic");
}

#[rstest]
fn failed_materialization_leaves_head_in_place() {
    let (repository, store, _refs) = failing_workspace_repo();
    commit_files_with(&repository, &store, &[("a.txt", "1")], "initial commit");
    let topic = repository.create_branch("topic", None).unwrap();

    let err = repository.checkout(&topic).unwrap_err();

    assert!(matches!(err, RepoError::CheckoutFailed { .. }));
    assert_eq!(repository.head_name().short_name(), "main");
}

#[rstest]
fn concurrent_checkouts_leave_head_and_working_state_consistent(repo: TestRepo) {
    commit_files(&repo, &[("a.txt", "main")], "initial commit");
    let topic = repo.repository.create_branch("topic", None).unwrap();
    repo.repository.checkout(&topic).unwrap();
    commit_files(&repo, &[("a.txt", "topic")], "topic work");

    let main = repo.repository.find_branch("main").unwrap();
    let topic = repo.repository.find_branch("topic").unwrap();

    std::thread::scope(|scope| {
        scope.spawn(|| repo.repository.checkout(&main).unwrap());
        scope.spawn(|| repo.repository.checkout(&topic).unwrap());
    });

    // whichever checkout finished last, HEAD and the working state agree
    let head = repo.repository.head().unwrap();
    assert_eq!(repo.workspace.materialized(), Some(head.tip().clone()));
}
