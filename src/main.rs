use congplot::error::AppResult;

fn main() -> AppResult<()> {
    congplot::entry::run()
}
