/*!

This is the long-form manual for `vote_resolution` and `voteaudit`.

## Input formats

The following formats are supported by `voteaudit`:
* `text` Free-form log lines
* `csv` Comma Separated Values

### `text`

One vote per line. The name of the candidate is everything after `candidate:`.
The time and the IP of the voter are read when the line looks like:

```text
time: 2024-03-01 10:15:00, ip: 10.1.2.3, candidate: Alice Martin
```

Lines without `candidate:` are ignored. When the time or the IP cannot be
understood, the vote is still counted, without that information.
Times may be written in RFC 3339 (`2024-03-01T10:15:00Z`), as
`2024-03-01 10:15:00` (UTC, optionally followed by an offset such as `+0200`), or
as a number of seconds since 1970.

### `csv`

Three columns: time, IP, candidate name. A first row whose first column is
`time` is treated as a header and skipped.

## Name resolution

Two spellings are the same name when their Levenshtein distance is at most
`maxEditDistance` (2 by default). The distance ignores case and counts
characters, not bytes.

The spellings are processed from the most frequent to the least frequent.
With the default `greedyAnchor` mode, a spelling joins the group of the closest
group founder within the distance. If several founders are equally close, the
group that has gathered the most votes so far wins, and then the oldest group.
A spelling that matches no founder starts a new group and becomes its founder.
Founders are the only spellings that other spellings are compared to, so a chain
of small differences does not merge distant names.

With the `transitive` mode, all the spellings within the distance of each other
are merged, and so on until no pair is left. The group takes the name of its most
frequent spelling. This merges more names, including some that are not similar.

The lookups go through a BK-tree so that a spelling is not compared with every
other one.

## Fraud signals

For each candidate:
* the IP that sent the most votes, and how many. Votes without a known IP are
  not counted as coming from an IP.
* the largest number of votes cast within `windowSeconds` seconds (3600 by
  default), and how many different IPs sent them. The window includes both of
  its ends.

The report flags the candidate with the most votes from a single IP, and the
candidate with the largest burst. These are indicators to look into, not proof of fraud.

## Configuration

The configuration is a JSON file:

```json
{
  "outputSettings": {
    "contestName": "Spring poll",
    "reportFile": "result.txt",
    "topN": 50
  },
  "recordSources": [
    { "provider": "text", "filePath": "votes.txt" }
  ],
  "rules": {
    "maxEditDistance": 2,
    "windowSeconds": 3600,
    "clusteringMode": "greedyAnchor"
  }
}
```

File paths are relative to the directory of the configuration file. All the
rules are optional. The options passed on the command line take precedence.

*/
