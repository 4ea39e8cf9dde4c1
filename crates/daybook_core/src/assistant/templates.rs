//! Offline reply templates used when no hosted provider is configured.
//!
//! Selection is keyword-driven over the lowercased input; coding topics
//! without a dedicated template get a generic code-bearing answer.

use super::intent::{Classification, ENTITY_TITLE};
use crate::model::message::{Category, Intent};

const BINARY_SEARCH: &str = r#"**Binary search** finds a value in a *sorted* sequence by halving the search range each step, so it runs in O(log n).

```python
def binary_search(items, target):
    low, high = 0, len(items) - 1
    while low <= high:
        mid = (low + high) // 2
        if items[mid] == target:
            return mid
        if items[mid] < target:
            low = mid + 1
        else:
            high = mid - 1
    return -1
```

Key points:
- The input must already be sorted.
- Compare with the middle element and discard the half that cannot contain the target.
- Return `-1` (or `None`) when the range becomes empty."#;

const SORTING: &str = r#"Here is **quicksort**, a classic divide-and-conquer sort (average O(n log n), worst case O(n²)):

```python
def quicksort(items):
    if len(items) <= 1:
        return items
    pivot = items[len(items) // 2]
    left = [x for x in items if x < pivot]
    middle = [x for x in items if x == pivot]
    right = [x for x in items if x > pivot]
    return quicksort(left) + middle + quicksort(right)
```

For comparison:
- **Merge sort**: always O(n log n), stable, needs O(n) extra space.
- **Bubble sort**: O(n²), only useful for teaching or tiny inputs.
- In practice, use your language's built-in sort (`sorted()`, `Array.prototype.sort`)."#;

const RECURSION: &str = r#"**Recursion** is when a function calls itself on a smaller version of the problem. Every recursive function needs a *base case* that stops the calls.

```python
def factorial(n):
    if n <= 1:          # base case
        return 1
    return n * factorial(n - 1)   # recursive case

def fibonacci(n, memo={}):
    if n < 2:
        return n
    if n not in memo:
        memo[n] = fibonacci(n - 1, memo) + fibonacci(n - 2, memo)
    return memo[n]
```

Tips:
- Make sure each call moves toward the base case.
- Memoize overlapping subproblems to avoid exponential time.
- Deep recursion can overflow the call stack; convert to a loop when needed."#;

const LINKED_LIST: &str = r#"A **linked list** stores elements in nodes where each node points to the next one.

```python
class Node:
    def __init__(self, value):
        self.value = value
        self.next = None

def reverse(head):
    prev = None
    current = head
    while current:
        nxt = current.next
        current.next = prev
        prev = current
        current = nxt
    return prev
```

- Insert/delete at the head: O(1).
- Access by index: O(n).
- Reversing in place uses three pointers: `prev`, `current`, `next`."#;

const API_FETCH: &str = r#"Here is how to call a JSON **API** with `fetch` and handle errors:

```javascript
async function getUser(id) {
  const response = await fetch(`https://api.example.com/users/${id}`, {
    headers: { "Accept": "application/json" },
  });
  if (!response.ok) {
    throw new Error(`Request failed with status ${response.status}`);
  }
  return response.json();
}

getUser(42)
  .then((user) => console.log(user.name))
  .catch((err) => console.error(err.message));
```

- Always check `response.ok` before parsing.
- Keep API keys on the server, never in client code."#;

const SQL: &str = r#"A common **SQL** pattern is joining two tables and aggregating:

```sql
SELECT c.name, COUNT(o.id) AS order_count, SUM(o.total) AS revenue
FROM customers c
LEFT JOIN orders o ON o.customer_id = c.id
WHERE o.created_at >= '2024-01-01'
GROUP BY c.name
HAVING COUNT(o.id) > 0
ORDER BY revenue DESC;
```

- `INNER JOIN` keeps only matching rows; `LEFT JOIN` keeps every row from the left table.
- Filter rows with `WHERE`, filter groups with `HAVING`.
- Add an index on join and filter columns for speed."#;

const REGEX: &str = r#"**Regular expressions** describe text patterns. A simple email check:

```javascript
const email = /^[^\s@]+@[^\s@]+\.[^\s@]+$/;
console.log(email.test("student@example.com")); // true
console.log(email.test("not-an-email"));        // false
```

Cheat sheet:
- `^` / `$` anchor the start and end.
- `\d` digit, `\w` word character, `\s` whitespace.
- `+` one or more, `*` zero or more, `?` optional, `{2,4}` a range.
- `( )` captures a group, `[abc]` matches one of a set."#;

const GIT: &str = r#"Everyday **git** workflow:

```bash
git checkout -b feature/login     # create a branch
git add -p                        # stage changes interactively
git commit -m "Add login form"
git pull --rebase origin main     # update with the latest main
git push -u origin feature/login
```

Undoing things:
- `git restore <file>` discards unstaged changes.
- `git reset --soft HEAD~1` undoes the last commit but keeps the changes.
- `git log --oneline --graph` shows history at a glance."#;

const BIG_O: &str = r#"**Big-O** describes how running time grows with input size.

| Complexity | Example |
|------------|---------|
| O(1) | Array index, hash map lookup |
| O(log n) | Binary search |
| O(n) | Single loop over the input |
| O(n log n) | Merge sort, quicksort (average) |
| O(n²) | Nested loops, bubble sort |

```python
def has_duplicates(items):      # O(n) with a set
    seen = set()
    for item in items:
        if item in seen:
            return True
        seen.add(item)
    return False
```

Drop constants and lower-order terms: O(2n + 5) is O(n)."#;

const GENERIC_CODE: &str = r#"Here is a general approach for tackling a coding problem:

1. Restate the problem and write down a few input/output examples.
2. Start with the simplest working solution.
3. Test edge cases: empty input, one element, duplicates, very large values.
4. Then optimize.

```python
def solve(data):
    # 1. validate input
    if not data:
        return None
    # 2. process step by step
    result = []
    for item in data:
        result.append(item)
    # 3. return the answer
    return result
```

Share your code or the error message and I can walk through it with you."#;

const TASK_HELP: &str = "I can help you manage tasks. Try:\n- \"add a task to finish the essay tomorrow\"\n- \"show my tasks\"\n- \"mark the task done\"\n\nTip: break large tasks into subtasks and give each one a due date.";

const NOTE_HELP: &str = "Notes keep your ideas in one place. Try:\n- \"make a note: lecture 5 covers dynamic programming\"\n- \"show my notes\"\n\nTip: tag notes by topic and link related notes to build a knowledge map. Turn on spaced review for anything you want to remember.";

const FOCUS_HELP: &str = "Ready to focus? The Pomodoro technique works like this:\n1. Work for 25 minutes on a single task.\n2. Take a 5 minute break.\n3. After every 4 focus sessions, take a longer 15 minute break.\n\nSay \"start a focus session\" and put your phone out of reach.";

const HABIT_HELP: &str = "Habits are built one day at a time. Try:\n- \"add a habit to read 20 pages\"\n- \"show my habits\"\n\nTip: check a habit off every day to grow your streak. Missing a day resets it, so keep habits small enough to do on a busy day.";

const GOAL_HELP: &str = "Let's set a learning goal. Try \"add a goal to learn linear algebra\", then split it into milestones. Progress updates automatically as you complete each milestone.";

const GREETING: &str = "Hello! I'm your study and productivity assistant. I can add tasks and notes, start a focus session, or explain programming concepts. What would you like to do?";

const DEFAULT_HELP: &str = "I'm not sure I understood that. Here is what I can do:\n- Manage tasks: \"add a task to submit the lab report tomorrow\"\n- Take notes: \"make a note: review chapter 3\"\n- Focus: \"start a pomodoro\"\n- Track habits and goals: \"add a habit to exercise\"\n- Explain code: \"what is binary search?\"";

/// Picks the offline reply for one classified input.
pub fn template_reply(input: &str, classification: &Classification) -> String {
    // Productivity requests never fall through to coding templates, even
    // when their text contains a coding keyword.
    if matches!(classification.category, Category::Coding | Category::General) {
        if let Some(topic) = coding_template(&input.to_lowercase()) {
            return topic.to_string();
        }
    }
    if classification.category == Category::Coding {
        return GENERIC_CODE.to_string();
    }

    if classification.intent == Intent::Create {
        if let Some(confirmation) = create_confirmation(classification) {
            return confirmation;
        }
    }

    let reply = match classification.category {
        Category::Task => TASK_HELP,
        Category::Note => NOTE_HELP,
        Category::Focus => FOCUS_HELP,
        Category::Habit => HABIT_HELP,
        Category::Goal => GOAL_HELP,
        Category::Coding | Category::General => {
            if classification.intent == Intent::Greeting {
                GREETING
            } else {
                DEFAULT_HELP
            }
        }
    };
    reply.to_string()
}

fn coding_template(lowered: &str) -> Option<&'static str> {
    const TABLE: &[(&[&str], &str)] = &[
        (&["binary search"], BINARY_SEARCH),
        (&["big-o", "big o", "time complexity"], BIG_O),
        (&["linked list"], LINKED_LIST),
        (&["recursion", "recursive"], RECURSION),
        (
            &["quicksort", "quick sort", "merge sort", "bubble sort", "sorting", "sort"],
            SORTING,
        ),
        (&["fetch", "api", "endpoint"], API_FETCH),
        (&["sql"], SQL),
        (&["regex", "regular expression"], REGEX),
        (&["git"], GIT),
    ];

    TABLE
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| contains_word(lowered, needle)))
        .map(|(_, reply)| *reply)
}

// Word-boundary containment so "api" does not match "capital".
fn contains_word(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, matched)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + matched.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

fn create_confirmation(classification: &Classification) -> Option<String> {
    let title = classification.entity(ENTITY_TITLE)?;
    let reply = match classification.category {
        Category::Task => format!("Added \"{title}\" to your tasks."),
        Category::Note => format!("Saved a note: \"{title}\"."),
        Category::Habit => format!("Nice! Track \"{title}\" from the habits view to start your streak."),
        Category::Goal => format!("Great goal: \"{title}\". Add a few milestones to track progress."),
        _ => return None,
    };
    Some(reply)
}

#[cfg(test)]
mod tests {
    use super::{contains_word, template_reply};
    use crate::assistant::intent::classify;

    #[test]
    fn binary_search_reply_has_code_listing() {
        let input = "what is binary search";
        let reply = template_reply(input, &classify(input));
        assert!(reply.contains("```"));
        assert!(reply.contains("def binary_search"));
    }

    #[test]
    fn unmatched_coding_topic_gets_generic_code() {
        let input = "help me debug my program";
        let reply = template_reply(input, &classify(input));
        assert!(reply.contains("```python"));
        assert!(reply.contains("def solve"));
    }

    #[test]
    fn word_match_respects_boundaries() {
        assert!(contains_word("call the api now", "api"));
        assert!(!contains_word("the capital city", "api"));
        assert!(contains_word("use git to commit", "git"));
        assert!(!contains_word("a digital planner", "git"));
    }

    #[test]
    fn create_task_reply_confirms_title() {
        let input = "add a task to buy milk";
        let reply = template_reply(input, &classify(input));
        assert_eq!(reply, "Added \"buy milk\" to your tasks.");
    }

    #[test]
    fn create_confirmation_wins_over_coding_keywords() {
        let input = "add a task to fetch the kids from school";
        let reply = template_reply(input, &classify(input));
        assert_eq!(reply, "Added \"fetch the kids from school\" to your tasks.");

        let input = "make a note: push the git branch tonight";
        let reply = template_reply(input, &classify(input));
        assert_eq!(reply, "Saved a note: \"push the git branch tonight\".");
    }

    #[test]
    fn bare_sort_question_gets_sorting_template() {
        let input = "how do I sort a list";
        let reply = template_reply(input, &classify(input));
        assert!(reply.contains("def quicksort"));
    }

    #[test]
    fn greeting_and_default() {
        assert!(template_reply("hello", &classify("hello")).starts_with("Hello!"));
        assert!(template_reply("qwerty", &classify("qwerty")).starts_with("I'm not sure"));
    }
}
