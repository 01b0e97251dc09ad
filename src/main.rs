use replaybench::error::AppResult;

fn main() -> AppResult<()> {
    replaybench::entry::run()
}
